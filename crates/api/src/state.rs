use std::sync::Arc;

use toolkit_core::tools::service::ToolService;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: the config sits behind an `Arc` and the service only
/// holds a shared store handle.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Tool query and mutation layer over the injected store.
    pub tools: ToolService,
}
