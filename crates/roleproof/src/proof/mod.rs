//! Role proofs: two-level, offline-verifiable delegation of authority.
//!
//! A trusted issuer vouches for an organization (the membership proof);
//! the organization grants a role to one of its actors (the role proof).
//! The resulting [`RoleProof`] is self-contained and attached to every
//! privileged call.

pub mod builder;
pub mod claim;
pub mod verify;

pub use builder::{build_membership_proof, build_role_proof};
pub use claim::{MembershipClaim, MembershipProof, RoleClaim, RoleProof};
pub use verify::{verify, Rejection, VerificationResult};
