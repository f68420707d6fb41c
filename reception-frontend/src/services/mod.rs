pub mod reception_client;

pub use reception_client::ReceptionClient;
