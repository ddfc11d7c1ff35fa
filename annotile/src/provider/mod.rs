//! Tile server access: HTTP transport, URL templates, and the server registry.

mod http;
mod servers;
mod template;

pub use http::{HttpClient, HttpError, ReqwestTileClient, TileResponse};
pub use servers::{TileServer, TileServers, DEFAULT_SERVER_KEY};
pub use template::{TemplateError, UrlTemplate};
