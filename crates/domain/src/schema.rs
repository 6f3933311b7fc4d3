// Diesel table definitions for the fixithere database.

diesel::table! {
    users (id) {
        id -> Uuid,
        email -> Text,
        name -> Text,
        role -> Text,
        is_active -> Bool,
        phone -> Text,
        avatar -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    repair_categories (id) {
        id -> Int8,
        name -> Text,
        color -> Text,
    }
}

diesel::table! {
    repair_offers (id) {
        id -> Int8,
        owner_id -> Uuid,
        master_id -> Nullable<Uuid>,
        title -> Text,
        description -> Text,
        private -> Bool,
        owner_grade_id -> Nullable<Int8>,
        master_grade_id -> Nullable<Int8>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    offer_categories (offer_id, category_id) {
        offer_id -> Int8,
        category_id -> Int8,
    }
}

diesel::table! {
    offer_canceled_masters (offer_id, user_id) {
        offer_id -> Int8,
        user_id -> Uuid,
    }
}

diesel::table! {
    offer_images (id) {
        id -> Int8,
        offer_id -> Int8,
        file_path -> Text,
    }
}

diesel::table! {
    grades (id) {
        id -> Int8,
        rating_user_id -> Uuid,
        valued_user_id -> Uuid,
        grade -> Int4,
        comment -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    grade_photos (id) {
        id -> Int8,
        grade_id -> Int8,
        file_path -> Text,
    }
}

diesel::table! {
    chats (id) {
        id -> Int8,
        name -> Text,
        object_id -> Int8,
        object_type -> Text,
        created_user_id -> Nullable<Uuid>,
        private -> Bool,
        deleted -> Bool,
        created_at -> Timestamptz,
        changed_at -> Timestamptz,
    }
}

diesel::table! {
    chat_participants (chat_id, user_id) {
        chat_id -> Int8,
        user_id -> Uuid,
    }
}

diesel::table! {
    messages (id) {
        id -> Int8,
        chat_id -> Int8,
        user_id -> Nullable<Uuid>,
        text -> Text,
        deleted -> Bool,
        created_at -> Timestamptz,
        changed_at -> Timestamptz,
    }
}

diesel::table! {
    message_reads (message_id, user_id) {
        message_id -> Int8,
        user_id -> Uuid,
    }
}

diesel::table! {
    subscription_actions (id) {
        id -> Int8,
        code -> Text,
        name -> Text,
        value -> Text,
        description -> Text,
    }
}

diesel::table! {
    subscription_plans (id) {
        id -> Int8,
        code -> Text,
        name -> Text,
        role -> Text,
        cost_minor -> Int4,
        currency -> Text,
        duration -> Int4,
        duration_type -> Text,
        disabled -> Bool,
        is_default -> Bool,
        active_date_start -> Nullable<Date>,
        active_date_end -> Nullable<Date>,
    }
}

diesel::table! {
    plan_actions (plan_id, action_id) {
        plan_id -> Int8,
        action_id -> Int8,
    }
}

diesel::table! {
    subscriptions (id) {
        id -> Int8,
        user_id -> Uuid,
        plan_id -> Int8,
        payment_id -> Text,
        start_date -> Date,
        expiration_date -> Date,
        value -> Text,
        active -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    subscription_freezes (id) {
        id -> Int8,
        subscription_id -> Int8,
        start_date -> Date,
        end_date -> Date,
    }
}

diesel::joinable!(offer_categories -> repair_offers (offer_id));
diesel::joinable!(offer_categories -> repair_categories (category_id));
diesel::joinable!(offer_canceled_masters -> repair_offers (offer_id));
diesel::joinable!(offer_images -> repair_offers (offer_id));
diesel::joinable!(grade_photos -> grades (grade_id));
diesel::joinable!(chat_participants -> chats (chat_id));
diesel::joinable!(messages -> chats (chat_id));
diesel::joinable!(message_reads -> messages (message_id));
diesel::joinable!(plan_actions -> subscription_plans (plan_id));
diesel::joinable!(plan_actions -> subscription_actions (action_id));
diesel::joinable!(subscriptions -> subscription_plans (plan_id));
diesel::joinable!(subscriptions -> users (user_id));
diesel::joinable!(subscription_freezes -> subscriptions (subscription_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    repair_categories,
    repair_offers,
    offer_categories,
    offer_canceled_masters,
    offer_images,
    grades,
    grade_photos,
    chats,
    chat_participants,
    messages,
    message_reads,
    subscription_actions,
    subscription_plans,
    plan_actions,
    subscriptions,
    subscription_freezes,
);
