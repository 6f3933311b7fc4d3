pub mod centrifugo_client;
