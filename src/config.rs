use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use crate::core::{DEFAULT_HORIZON_MONTHS, ProjectionConfig};
use crate::error::{ConfigError, MAX_HORIZON_MONTHS};
use crate::store::DEFAULT_HISTORY_CAPACITY;

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    pub history_capacity: usize,
}

impl ServerConfig {
    pub fn new(host: IpAddr, port: u16, history_capacity: usize) -> Result<Self, ConfigError> {
        if history_capacity == 0 {
            return Err(ConfigError::ZeroHistoryCapacity);
        }
        Ok(Self {
            host,
            port,
            history_capacity,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

// Growth arrives in percent per month.
pub fn projection_config(
    horizon_months: Option<u32>,
    volume_growth_percent: Option<f64>,
) -> Result<ProjectionConfig, ConfigError> {
    let horizon_months = horizon_months.unwrap_or(DEFAULT_HORIZON_MONTHS);
    if !(1..=MAX_HORIZON_MONTHS).contains(&horizon_months) {
        return Err(ConfigError::HorizonOutOfRange(horizon_months));
    }

    let growth_percent = volume_growth_percent.unwrap_or(0.0);
    if !growth_percent.is_finite() || growth_percent < -100.0 {
        return Err(ConfigError::InvalidVolumeGrowth(growth_percent.to_string()));
    }

    Ok(ProjectionConfig {
        horizon_months,
        monthly_volume_growth: growth_percent / 100.0,
    })
}
