pub mod mock_transport;
pub mod mock_zone_provider;
