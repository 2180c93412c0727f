pub mod api;
pub mod apikey;
pub mod assets;
pub mod cert;
pub mod openapi;
pub mod state;
pub mod store;
