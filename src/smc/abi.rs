//! Sharding manager contract ABI and the table of supported mutating calls.

use std::fmt;
use std::str::FromStr;

use alloy::dyn_abi::{DynSolType, DynSolValue};
use alloy::primitives::{Bytes, B256};
use alloy::sol;
use alloy::sol_types::SolCall;
use thiserror::Error;

use crate::smc::types::{Period, ShardId};

sol! {
    /// Sharding manager contract. Integers are the contract's native `int128`.
    #[derive(Debug, PartialEq, Eq)]
    interface ISMC {
        function does_notary_exist(address notary_address) external view returns (bool);
        function get_notary_info(address notary_address) external view returns (int128 deregistered_period, int128 pool_index);
        function notary_pool_len() external view returns (int128);
        function notary_pool(int128 pool_index) external view returns (address);
        function empty_slots_stack_top() external view returns (int128);
        function empty_slots_stack(int128 stack_index) external view returns (int128);
        function current_period_notary_sample_size() external view returns (int128);
        function next_period_notary_sample_size() external view returns (int128);
        function notary_sample_size_updated_period() external view returns (int128);
        function records_updated_period(int128 shard_id) external view returns (int128);
        function head_collation_period(int128 shard_id) external view returns (int128);
        function get_member_of_committee(int128 shard_id, int128 index) external view returns (address);
        function collation_records__chunk_root(int128 period, int128 shard_id) external view returns (bytes32);
        function collation_records__proposer(int128 period, int128 shard_id) external view returns (address);
        function collation_records__is_elected(int128 period, int128 shard_id) external view returns (bool);
        function current_vote(int128 shard_id) external view returns (bytes32);
        function get_vote_count(int128 shard_id) external view returns (int128);
        function has_notary_voted(int128 shard_id, int128 index) external view returns (bool);

        function register_notary() external payable returns (bool);
        function deregister_notary() external returns (bool);
        function release_notary() external returns (bool);
        function add_header(int128 period, int128 shard_id, bytes32 chunk_root) external returns (bool);
        function submit_vote(int128 period, int128 shard_id, bytes32 chunk_root, int128 index) external returns (bool);
    }
}

/// Rejected attempt to build a call from a method name and loose arguments.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EncodingError {
    #[error("unknown registry method '{0}'")]
    UnknownMethod(String),

    #[error("{method} takes {expected} argument(s), got {actual}")]
    Arity {
        method: SmcMethod,
        expected: usize,
        actual: usize,
    },

    #[error("{method} argument {index}: expected {expected}, got {actual}")]
    ArgumentType {
        method: SmcMethod,
        index: usize,
        expected: String,
        actual: String,
    },

    #[error("{method} argument {index}: {reason}")]
    Range {
        method: SmcMethod,
        index: usize,
        reason: String,
    },
}

/// State-changing registry methods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SmcMethod {
    RegisterNotary,
    DeregisterNotary,
    ReleaseNotary,
    AddHeader,
    SubmitVote,
}

impl SmcMethod {
    pub const ALL: [SmcMethod; 5] = [
        SmcMethod::RegisterNotary,
        SmcMethod::DeregisterNotary,
        SmcMethod::ReleaseNotary,
        SmcMethod::AddHeader,
        SmcMethod::SubmitVote,
    ];

    /// Contract-level method name.
    pub fn name(self) -> &'static str {
        match self {
            SmcMethod::RegisterNotary => "register_notary",
            SmcMethod::DeregisterNotary => "deregister_notary",
            SmcMethod::ReleaseNotary => "release_notary",
            SmcMethod::AddHeader => "add_header",
            SmcMethod::SubmitVote => "submit_vote",
        }
    }

    pub fn selector(self) -> [u8; 4] {
        match self {
            SmcMethod::RegisterNotary => ISMC::register_notaryCall::SELECTOR,
            SmcMethod::DeregisterNotary => ISMC::deregister_notaryCall::SELECTOR,
            SmcMethod::ReleaseNotary => ISMC::release_notaryCall::SELECTOR,
            SmcMethod::AddHeader => ISMC::add_headerCall::SELECTOR,
            SmcMethod::SubmitVote => ISMC::submit_voteCall::SELECTOR,
        }
    }

    /// Fixed parameter list, in ABI order.
    pub fn param_types(self) -> Vec<DynSolType> {
        match self {
            SmcMethod::RegisterNotary | SmcMethod::DeregisterNotary | SmcMethod::ReleaseNotary => {
                Vec::new()
            }
            SmcMethod::AddHeader => vec![
                DynSolType::Int(128),
                DynSolType::Int(128),
                DynSolType::FixedBytes(32),
            ],
            SmcMethod::SubmitVote => vec![
                DynSolType::Int(128),
                DynSolType::Int(128),
                DynSolType::FixedBytes(32),
                DynSolType::Int(128),
            ],
        }
    }
}

impl fmt::Display for SmcMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SmcMethod {
    type Err = EncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SmcMethod::ALL
            .into_iter()
            .find(|m| m.name() == s)
            .ok_or_else(|| EncodingError::UnknownMethod(s.to_string()))
    }
}

/// A fully-specified state-changing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmcCall {
    RegisterNotary,
    DeregisterNotary,
    ReleaseNotary,
    AddHeader {
        period: Period,
        shard_id: ShardId,
        chunk_root: B256,
    },
    SubmitVote {
        period: Period,
        shard_id: ShardId,
        chunk_root: B256,
        index: u64,
    },
}

impl SmcCall {
    pub fn method(&self) -> SmcMethod {
        match self {
            SmcCall::RegisterNotary => SmcMethod::RegisterNotary,
            SmcCall::DeregisterNotary => SmcMethod::DeregisterNotary,
            SmcCall::ReleaseNotary => SmcMethod::ReleaseNotary,
            SmcCall::AddHeader { .. } => SmcMethod::AddHeader,
            SmcCall::SubmitVote { .. } => SmcMethod::SubmitVote,
        }
    }

    /// Selector followed by the ABI-encoded arguments.
    pub fn encode(&self) -> Bytes {
        let data = match *self {
            SmcCall::RegisterNotary => ISMC::register_notaryCall {}.abi_encode(),
            SmcCall::DeregisterNotary => ISMC::deregister_notaryCall {}.abi_encode(),
            SmcCall::ReleaseNotary => ISMC::release_notaryCall {}.abi_encode(),
            SmcCall::AddHeader {
                period,
                shard_id,
                chunk_root,
            } => ISMC::add_headerCall {
                period: period.into(),
                shard_id: shard_id.into(),
                chunk_root,
            }
            .abi_encode(),
            SmcCall::SubmitVote {
                period,
                shard_id,
                chunk_root,
                index,
            } => ISMC::submit_voteCall {
                period: period.into(),
                shard_id: shard_id.into(),
                chunk_root,
                index: i128::from(index),
            }
            .abi_encode(),
        };
        data.into()
    }

    /// Build a call from a method and dynamically typed arguments.
    ///
    /// Every argument must be present and match the method's parameter list;
    /// nothing is defaulted.
    pub fn from_parts(method: SmcMethod, args: &[DynSolValue]) -> Result<Self, EncodingError> {
        let expected = method.param_types();
        if args.len() != expected.len() {
            return Err(EncodingError::Arity {
                method,
                expected: expected.len(),
                actual: args.len(),
            });
        }
        for (index, (arg, ty)) in args.iter().zip(&expected).enumerate() {
            if !ty.matches(arg) {
                return Err(EncodingError::ArgumentType {
                    method,
                    index,
                    expected: ty.sol_type_name().into_owned(),
                    actual: arg
                        .sol_type_name()
                        .map(|n| n.into_owned())
                        .unwrap_or_else(|| "unknown".to_string()),
                });
            }
        }

        let call = match method {
            SmcMethod::RegisterNotary => SmcCall::RegisterNotary,
            SmcMethod::DeregisterNotary => SmcCall::DeregisterNotary,
            SmcMethod::ReleaseNotary => SmcCall::ReleaseNotary,
            SmcMethod::AddHeader => SmcCall::AddHeader {
                period: Period(non_negative(method, 0, &args[0])?),
                shard_id: ShardId(non_negative(method, 1, &args[1])?),
                chunk_root: word(method, 2, &args[2])?,
            },
            SmcMethod::SubmitVote => SmcCall::SubmitVote {
                period: Period(non_negative(method, 0, &args[0])?),
                shard_id: ShardId(non_negative(method, 1, &args[1])?),
                chunk_root: word(method, 2, &args[2])?,
                index: non_negative(method, 3, &args[3])?,
            },
        };
        Ok(call)
    }

    /// Build a call from a method name and textual arguments (CLI input).
    pub fn parse(method: &str, args: &[&str]) -> Result<Self, EncodingError> {
        let method: SmcMethod = method.parse()?;
        let types = method.param_types();
        if args.len() != types.len() {
            return Err(EncodingError::Arity {
                method,
                expected: types.len(),
                actual: args.len(),
            });
        }
        let values = args
            .iter()
            .zip(&types)
            .enumerate()
            .map(|(index, (raw, ty))| {
                ty.coerce_str(raw).map_err(|e| EncodingError::ArgumentType {
                    method,
                    index,
                    expected: ty.sol_type_name().into_owned(),
                    actual: format!("'{}' ({})", raw, e),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_parts(method, &values)
    }
}

fn non_negative(method: SmcMethod, index: usize, value: &DynSolValue) -> Result<u64, EncodingError> {
    let out_of_range = |reason: String| EncodingError::Range {
        method,
        index,
        reason,
    };
    match value {
        DynSolValue::Int(v, _) => {
            let v = i128::try_from(*v).map_err(|_| out_of_range(format!("{} overflows int128", v)))?;
            u64::try_from(v).map_err(|_| out_of_range(format!("{} is not a valid u64", v)))
        }
        // Type already checked against the parameter list.
        _ => Err(out_of_range("not an integer".to_string())),
    }
}

fn word(method: SmcMethod, index: usize, value: &DynSolValue) -> Result<B256, EncodingError> {
    match value {
        DynSolValue::FixedBytes(w, 32) => Ok(*w),
        other => Err(EncodingError::ArgumentType {
            method,
            index,
            expected: "bytes32".to_string(),
            actual: other
                .sol_type_name()
                .map(|n| n.into_owned())
                .unwrap_or_else(|| "unknown".to_string()),
        }),
    }
}
