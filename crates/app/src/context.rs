//! App Context

use std::{path::PathBuf, sync::Arc};

use thiserror::Error;

use crate::{
    api::{ApiClient, ApiConfig, Transport},
    domain::{
        admin::{AdminService, RemoteAdminService},
        carts::{
            CartsService, LocalCartsService, RemoteCartsService,
            store::{LocalCartStore, LocalStoreError},
        },
        catalog::{CatalogService, RemoteCatalogService},
        instances::{InstancesService, RemoteInstancesService},
        orders::{OrdersService, RemoteOrdersService},
        payments::{PaymentsService, RemotePaymentsService},
    },
    notify::Notifier,
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to open the saved cart at {path}")]
    CartStore {
        path: PathBuf,
        #[source]
        source: LocalStoreError,
    },
}

/// Every service the console needs, constructed once at startup and passed
/// by reference to the commands that use them.
#[derive(Clone)]
pub struct AppContext {
    pub carts: Arc<dyn CartsService>,
    pub catalog: Arc<dyn CatalogService>,
    pub orders: Arc<dyn OrdersService>,
    pub payments: Arc<dyn PaymentsService>,
    pub instances: Arc<dyn InstancesService>,
    pub admin: Arc<dyn AdminService>,
    pub notifier: Arc<Notifier>,
}

impl AppContext {
    /// Wire the service graph over one shared transport.
    ///
    /// Authenticated sessions use the server-backed cart; anonymous ones
    /// price locally against the saved cart file.
    ///
    /// # Errors
    ///
    /// Returns an error when the saved cart exists but cannot be loaded.
    pub fn new(api: ApiConfig, cart_store_path: PathBuf) -> Result<Self, AppInitError> {
        let authenticated = api.is_authenticated();

        let transport: Arc<dyn Transport> = Arc::new(ApiClient::new(api));

        let store = Arc::new(LocalCartStore::open(cart_store_path.clone()).map_err(|source| {
            AppInitError::CartStore {
                path: cart_store_path,
                source,
            }
        })?);

        let catalog = Arc::new(RemoteCatalogService::new(Arc::clone(&transport)));

        let carts: Arc<dyn CartsService> = if authenticated {
            Arc::new(RemoteCartsService::new(Arc::clone(&transport), store))
        } else {
            let catalog: Arc<dyn CatalogService> = Arc::clone(&catalog);

            Arc::new(LocalCartsService::new(catalog, store))
        };

        Ok(Self {
            carts,
            catalog,
            orders: Arc::new(RemoteOrdersService::new(Arc::clone(&transport))),
            payments: Arc::new(RemotePaymentsService::new(Arc::clone(&transport))),
            instances: Arc::new(RemoteInstancesService::new(Arc::clone(&transport))),
            admin: Arc::new(RemoteAdminService::new(transport)),
            notifier: Arc::new(Notifier::default()),
        })
    }
}
