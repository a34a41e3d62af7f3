use std::sync::Arc;
use tracing::info;
use triedns_application::ports::{DnsResolver, ResponseCachePort, ZoneLookup};
use triedns_application::use_cases::{HandleClientRequestUseCase, ResolveNameUseCase};
use triedns_domain::{Config, ResolverMode};
use triedns_infrastructure::dns::{
    DnsServerHandler, ForwardingResolver, IterativeResolver, NetworkTransport, ResolverCounters,
    ResponseCache, UpstreamQuerier, ZoneFileProvider, ZoneStore,
};

pub struct DnsServices {
    pub cache: Arc<ResponseCache>,
    pub counters: Arc<ResolverCounters>,
    pub resolve: Arc<ResolveNameUseCase>,
    pub client_requests: Arc<HandleClientRequestUseCase>,
}

impl DnsServices {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        info!(mode = %config.resolver.mode, "Initializing DNS services");

        let zones = Arc::new(Self::load_zones(config)?);
        let cache = Arc::new(ResponseCache::from_config(&config.cache));
        let counters = Arc::new(ResolverCounters::new());

        let querier = Arc::new(UpstreamQuerier::new(
            Arc::new(NetworkTransport),
            counters.clone(),
            &config.resolver,
        ));
        let resolver: Arc<dyn DnsResolver> = match config.resolver.mode {
            ResolverMode::Forward => Arc::new(ForwardingResolver::new(querier, &config.resolver)),
            ResolverMode::Iterative => {
                Arc::new(IterativeResolver::new(querier, &config.resolver))
            }
        };

        let resolve = Arc::new(ResolveNameUseCase::new(
            cache.clone() as Arc<dyn ResponseCachePort>,
            zones.clone() as Arc<dyn ZoneLookup>,
            resolver,
        ));
        let client_requests = Arc::new(HandleClientRequestUseCase::new(
            resolve.clone(),
            zones.clone(),
        ));

        info!(
            zones = zones.zone_count(),
            cache_buckets = cache.bucket_count(),
            "DNS services ready"
        );

        Ok(Self {
            cache,
            counters,
            resolve,
            client_requests,
        })
    }

    fn load_zones(config: &Config) -> anyhow::Result<ZoneStore> {
        match &config.zones.index {
            Some(index) => {
                let provider = ZoneFileProvider::open(index)?;
                Ok(ZoneStore::build(&provider)?)
            }
            None => {
                info!("No zone index configured, forwarding everything");
                Ok(ZoneStore::empty())
            }
        }
    }

    pub fn dns_handler(&self, config: &Config) -> DnsServerHandler {
        DnsServerHandler::new(self.resolve.clone(), config.resolver.edns_payload_size)
    }
}
