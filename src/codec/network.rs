//! Network status and stake-pool entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{MaintenanceStatus, NtpStatus};
use super::quantity::{Amount, Quantity};
use super::wallet::{NetworkTip, NextEpoch, SyncStatus};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkInfo {
    pub sync_progress: SyncStatus,
    pub node_tip: NetworkTip,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_tip: Option<NetworkTip>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_epoch: Option<NextEpoch>,
}

/// `offset` is in microseconds and may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkClock {
    pub status: NtpStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<Quantity<f64>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkParameters {
    pub genesis_block_hash: String,
    pub blockchain_start_time: DateTime<Utc>,
    pub slot_length: Quantity<f64>,
    pub epoch_length: Quantity<u64>,
    pub epoch_stability: Quantity<u64>,
    pub active_slot_coefficient: Quantity<f64>,
    pub decentralization_level: Quantity<f64>,
    pub desired_pool_number: u32,
    pub minimum_utxo_value: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hardfork_at: Option<NextEpoch>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StakePool {
    pub id: String,
    pub metrics: StakePoolMetrics,
    pub cost: Amount,
    pub margin: Quantity<f64>,
    pub pledge: Amount,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<StakePoolMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retirement: Option<NextEpoch>,
    #[serde(default)]
    pub flags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StakePoolMetrics {
    pub non_myopic_member_rewards: Amount,
    pub relative_stake: Quantity<f64>,
    pub saturation: f64,
    pub produced_blocks: Quantity<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakePoolMetadata {
    pub ticker: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub homepage: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceActions {
    pub gc_stake_pools: GcStakePools,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GcStakePools {
    pub status: MaintenanceStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_run: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct MaintenanceActionBody {
    pub maintenance_action: &'static str,
}

impl MaintenanceActionBody {
    pub fn gc_stake_pools() -> Self { Self { maintenance_action: "gc_stake_pools" } }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::enums::{SyncState, Unit};
    use serde_json::json;

    #[test]
    fn test_decode_network_info() {
        let info: NetworkInfo = serde_json::from_value(json!({
            "sync_progress": {"status": "READY"},
            "node_tip": {"epoch_number": 14, "slot_number": 1337, "height": {"quantity": 1337, "unit": "block"}},
            "network_tip": {"epoch_number": 14, "slot_number": 1337},
            "next_epoch": {"epoch_number": 15, "epoch_start_time": "2019-02-27T14:46:45Z"}
        }))
        .unwrap();
        assert_eq!(info.sync_progress.status, SyncState::Ready);
        assert_eq!(info.next_epoch.unwrap().epoch_number, 15);
    }

    #[test]
    fn test_decode_clock_negative_offset() {
        let clock: NetworkClock = serde_json::from_value(json!({
            "status": "available",
            "offset": {"quantity": -30, "unit": "microsecond"}
        }))
        .unwrap();
        assert_eq!(clock.offset, Some(Quantity::new(-30.0, Unit::Microsecond)));
    }

    #[test]
    fn test_decode_stake_pool() {
        let pool: StakePool = serde_json::from_value(json!({
            "id": "pool1wqaz0q0zhtxlgn0ewssevn2mrtm30fgh2g7hr7z9rj5856457mm",
            "metrics": {
                "non_myopic_member_rewards": {"quantity": 0, "unit": "entropic"},
                "relative_stake": {"quantity": 42.0, "unit": "percent"},
                "saturation": 0.74,
                "produced_blocks": {"quantity": 1337, "unit": "block"}
            },
            "cost": {"quantity": 340000000, "unit": "entropic"},
            "margin": {"quantity": 3.5, "unit": "percent"},
            "pledge": {"quantity": 100000000, "unit": "entropic"},
            "metadata": {"ticker": "IOHK", "name": "Pool", "homepage": "https://example.org"},
            "flags": ["delisted"]
        }))
        .unwrap();
        assert_eq!(pool.metadata.unwrap().ticker, "IOHK");
        assert!(pool.retirement.is_none());
    }

    #[test]
    fn test_decode_maintenance_actions() {
        let actions: MaintenanceActions = serde_json::from_value(json!({
            "gc_stake_pools": {"status": "has_run", "last_run": "2019-02-27T14:46:45Z"}
        }))
        .unwrap();
        assert_eq!(actions.gc_stake_pools.status, MaintenanceStatus::HasRun);
    }
}
