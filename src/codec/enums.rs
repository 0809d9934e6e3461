//! Closed value sets carried on the wire as lowercase strings.
//!
//! Decoding is a case-insensitive match against the fixed set. Anything else
//! is a decode failure, never a silent default.

use crate::error::ApiError;

macro_rules! wire_enum {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident => $wire:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name { $($(#[$vmeta])* $variant),+ }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self { $($name::$variant => $wire),+ }
            }

            pub fn parse(value: &str) -> Option<Self> {
                let value = value.trim();
                Self::ALL.iter().copied().find(|v| v.as_str().eq_ignore_ascii_case(value))
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { f.write_str(self.as_str()) }
        }

        impl std::str::FromStr for $name {
            type Err = ApiError;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s).ok_or_else(|| ApiError::decode(stringify!($name), format!("unknown value '{}'", s)))
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Self::parse(&raw).ok_or_else(|| {
                    serde::de::Error::custom(format!("unknown {} value '{}'", stringify!($name), raw))
                })
            }
        }
    };
}

wire_enum! {
    /// Unit tag of a quantity. `Entropic` is the smallest currency unit.
    Unit {
        Entropic => "entropic",
        Percent => "percent",
        Block => "block",
        Slot => "slot",
        Second => "second",
        Microsecond => "microsecond",
    }
}

wire_enum! {
    /// Chain-synchronization state reported for a wallet or the node.
    SyncState {
        Ready => "ready",
        Syncing => "syncing",
        NotResponding => "not_responding",
    }
}

wire_enum! {
    DelegationStatus {
        Delegating => "delegating",
        NotDelegating => "not_delegating",
    }
}

wire_enum! {
    /// Query qualifier for `list_addresses`.
    AddressFilter {
        Used => "used",
        Unused => "unused",
    }
}

wire_enum! {
    TxStatus {
        Pending => "pending",
        InLedger => "in_ledger",
        Expired => "expired",
    }
}

wire_enum! {
    TxDirection {
        Outgoing => "outgoing",
        Incoming => "incoming",
    }
}

wire_enum! {
    /// Sort direction for `list_transactions`, sent verbatim.
    Order {
        Ascending => "ascending",
        Descending => "descending",
    }
}

wire_enum! {
    NtpStatus {
        Available => "available",
        Unavailable => "unavailable",
        Pending => "pending",
    }
}

wire_enum! {
    MaintenanceStatus {
        NotApplicable => "not_applicable",
        NotStarted => "not_started",
        Restarting => "restarting",
        HasRun => "has_run",
    }
}

impl Default for Order {
    fn default() -> Self { Order::Descending }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_insensitive_decode() {
        let state: SyncState = serde_json::from_str("\"NOT_RESPONDING\"").unwrap();
        assert_eq!(state, SyncState::NotResponding);
        assert_eq!(AddressFilter::parse(" Unused "), Some(AddressFilter::Unused));
        assert_eq!("In_Ledger".parse::<TxStatus>().unwrap(), TxStatus::InLedger);
    }

    #[test]
    fn test_unknown_value_is_error() {
        let result: Result<DelegationStatus, _> = serde_json::from_str("\"retiring\"");
        let err = result.unwrap_err().to_string();
        assert!(err.contains("DelegationStatus"));
        assert!(err.contains("retiring"));

        let parsed = "sideways".parse::<Order>();
        assert_eq!(parsed.unwrap_err().code(), crate::error::DECODE);
    }

    #[test]
    fn test_encode_lowercase() {
        assert_eq!(serde_json::to_string(&Unit::Entropic).unwrap(), "\"entropic\"");
        assert_eq!(Order::default().as_str(), "descending");
        assert_eq!(MaintenanceStatus::HasRun.to_string(), "has_run");
    }
}
