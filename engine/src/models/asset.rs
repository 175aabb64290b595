//! Static asset-class catalog
//!
//! The simulated treasury holds exactly four asset classes. The set is
//! fixed at compile time and is not user-extensible: the engine addresses
//! holdings by `AssetId`, and the view reads display metadata from the
//! catalog when it draws the allocation chart.

use serde::{Deserialize, Serialize};

/// Identifier for one of the four asset classes.
///
/// String keys follow the catalog (`usdc`, `tBills`, `bonds`, `cash`) so
/// serialized snapshots line up with what the view expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetId {
    #[serde(rename = "usdc")]
    Usdc,
    #[serde(rename = "tBills")]
    TBills,
    #[serde(rename = "bonds")]
    Bonds,
    #[serde(rename = "cash")]
    Cash,
}

impl AssetId {
    /// All asset ids, in display order.
    pub const ALL: [AssetId; 4] = [AssetId::Usdc, AssetId::TBills, AssetId::Bonds, AssetId::Cash];

    /// Catalog key for this asset id.
    pub fn key(self) -> &'static str {
        match self {
            AssetId::Usdc => "usdc",
            AssetId::TBills => "tBills",
            AssetId::Bonds => "bonds",
            AssetId::Cash => "cash",
        }
    }

    /// Parse a catalog key. Returns `None` for unknown keys.
    pub fn from_key(key: &str) -> Option<AssetId> {
        match key {
            "usdc" => Some(AssetId::Usdc),
            "tBills" => Some(AssetId::TBills),
            "bonds" => Some(AssetId::Bonds),
            "cash" => Some(AssetId::Cash),
            _ => None,
        }
    }
}

/// Display metadata for a single asset class.
///
/// Purely descriptive; no engine logic reads anything here except the id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AssetClass {
    pub id: AssetId,
    pub name: &'static str,
    pub color: &'static str,
    pub description: &'static str,
}

/// The full catalog, in display order.
pub const ASSET_CATALOG: [AssetClass; 4] = [
    AssetClass {
        id: AssetId::Usdc,
        name: "USDC",
        color: "#2775CA",
        description: "Stablecoin reserves held for instant settlement.",
    },
    AssetClass {
        id: AssetId::TBills,
        name: "T-Bills",
        color: "#3D9970",
        description: "Tokenized short-term Treasury bills, the low-risk yield sleeve.",
    },
    AssetClass {
        id: AssetId::Bonds,
        name: "Corporate Bonds",
        color: "#F5A623",
        description: "Corporate bond exposure, the highest-yield and highest-risk sleeve.",
    },
    AssetClass {
        id: AssetId::Cash,
        name: "Cash",
        color: "#8A92B2",
        description: "Idle operating cash earmarked for payouts.",
    },
];

/// Look up catalog metadata for an asset id.
pub fn asset_class(id: AssetId) -> &'static AssetClass {
    &ASSET_CATALOG[id as usize]
}
