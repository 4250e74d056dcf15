//! # Fork Schedule Entities
//!
//! The activation schedule a node applies block by block. Field names
//! serialize in the camelCase form used by genesis documents.

use super::errors::BlockHeight;
use serde::{Deserialize, Serialize};

/// Contract code size limit in bytes when no stepped value has activated.
pub const DEFAULT_MAX_CODE_SIZE: u64 = 24_576;

/// Chain ID of the development schedule returned by
/// [`ForkSchedule::all_protocol_changes`].
pub const DEV_CHAIN_ID: u64 = 1337;

/// Scalar forks that can be queried with [`ForkSchedule::is_active`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Fork {
    /// Homestead.
    Homestead,
    /// DAO hard fork.
    DaoFork,
    /// EIP-150 gas repricing.
    Eip150,
    /// EIP-155 replay protection.
    Eip155,
    /// EIP-158 state clearing.
    Eip158,
    /// Byzantium.
    Byzantium,
    /// Constantinople.
    Constantinople,
    /// Petersburg.
    Petersburg,
    /// Istanbul.
    Istanbul,
    /// Istanbul consensus quorum switch to ceil(2N/3).
    Ceil2Nby3,
    /// Permissioning gate (QIP-714).
    Permissions,
}

/// One step of a stepped parameter: `value` applies from `block` onwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterStep {
    /// Activation height of this step.
    pub block: BlockHeight,
    /// Parameter value (for code size: KiB).
    #[serde(rename = "size")]
    pub value: u64,
}

impl ParameterStep {
    /// Create a step.
    pub fn new(block: BlockHeight, value: u64) -> Self {
        Self { block, value }
    }
}

/// Istanbul-family sub-schedule.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IstanbulSchedule {
    /// Switch of the BFT quorum size to ceil(2N/3).
    #[serde(rename = "ceil2Nby3Block", skip_serializing_if = "Option::is_none")]
    pub ceil2nby3_block: Option<BlockHeight>,
}

/// Protocol upgrade schedule.
///
/// `None` means the fork is never scheduled. Schedules are treated as
/// immutable snapshots; nothing here checks that heights are ordered.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ForkSchedule {
    /// Chain ID used for replay protection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chain_id: Option<u64>,
    /// Homestead switch block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homestead_block: Option<BlockHeight>,
    /// DAO hard-fork switch block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dao_fork_block: Option<BlockHeight>,
    /// Whether the node supports the DAO hard-fork.
    pub dao_fork_support: bool,
    /// EIP-150 switch block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eip150_block: Option<BlockHeight>,
    /// EIP-155 switch block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eip155_block: Option<BlockHeight>,
    /// EIP-158 switch block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eip158_block: Option<BlockHeight>,
    /// Byzantium switch block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub byzantium_block: Option<BlockHeight>,
    /// Constantinople switch block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constantinople_block: Option<BlockHeight>,
    /// Petersburg switch block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub petersburg_block: Option<BlockHeight>,
    /// Istanbul switch block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub istanbul_block: Option<BlockHeight>,
    /// Istanbul-family sub-schedule.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub istanbul: Option<IstanbulSchedule>,
    /// Permissioning gate switch block.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qip714_block: Option<BlockHeight>,
    /// Max contract code size steps, ascending by block.
    #[serde(rename = "maxCodeSizeConfig", skip_serializing_if = "Vec::is_empty")]
    pub max_code_size: Vec<ParameterStep>,
}

impl ForkSchedule {
    /// Every fork active from genesis on the development chain.
    pub fn all_protocol_changes() -> Self {
        Self {
            chain_id: Some(DEV_CHAIN_ID),
            homestead_block: Some(0),
            dao_fork_block: None,
            dao_fork_support: false,
            eip150_block: Some(0),
            eip155_block: Some(0),
            eip158_block: Some(0),
            byzantium_block: Some(0),
            constantinople_block: Some(0),
            petersburg_block: Some(0),
            istanbul_block: Some(0),
            istanbul: None,
            qip714_block: Some(0),
            max_code_size: Vec::new(),
        }
    }

    /// Activation height of a scalar fork, `None` if never scheduled.
    pub fn activation(&self, fork: Fork) -> Option<BlockHeight> {
        match fork {
            Fork::Homestead => self.homestead_block,
            Fork::DaoFork => self.dao_fork_block,
            Fork::Eip150 => self.eip150_block,
            Fork::Eip155 => self.eip155_block,
            Fork::Eip158 => self.eip158_block,
            Fork::Byzantium => self.byzantium_block,
            Fork::Constantinople => self.constantinople_block,
            Fork::Petersburg => self.petersburg_block,
            Fork::Istanbul => self.istanbul_block,
            Fork::Ceil2Nby3 => self.istanbul.as_ref().and_then(|i| i.ceil2nby3_block),
            Fork::Permissions => self.qip714_block,
        }
    }

    /// Whether `fork` applies to the block at `height`.
    pub fn is_active(&self, fork: Fork, height: BlockHeight) -> bool {
        self.activation(fork).is_some_and(|block| block <= height)
    }

    /// Max contract code size in bytes for the block at `height`.
    ///
    /// Saturates at `u64::MAX` for oversized configured values.
    pub fn max_code_size_at(&self, height: BlockHeight) -> u64 {
        self.max_code_size
            .iter()
            .take_while(|step| step.block <= height)
            .last()
            .map_or(DEFAULT_MAX_CODE_SIZE, |step| step.value.saturating_mul(1024))
    }
}
