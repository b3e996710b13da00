//! Banner administration.
//!
//! - [`rpc`]: request and response bodies of the admin endpoints
//! - [`service`]: the operations those endpoints run
//! - [`draft`]: editor state and delete confirmation on the client side

pub mod draft;
pub mod rpc;
pub mod service;

pub use draft::{BannerDraft, DeleteIntent};
pub use rpc::{
    BannerSummary, DeleteRequest, FetchRequest, IdRequest, ListRequest, RpcResponse, SaveRequest,
};
pub use service::{
    delete_banner, fetch_banner, list_banners, save_banner, DELETED_MESSAGE, SAVED_MESSAGE,
};
