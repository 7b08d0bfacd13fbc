pub mod collector;
pub mod dataset;
pub mod elo;
pub mod http_client;
pub mod scores_fetch;
