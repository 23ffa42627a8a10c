//! Map types behind the dependency graph. `std-hash` swaps in the std maps.

use crate::dependency::{DependencyRecord, FieldKey};
use crate::SubjectId;

#[cfg(feature = "std-hash")]
use std::collections::HashMap;

#[cfg(not(feature = "std-hash"))]
use hashbrown::HashMap;

/// Records of one subject, keyed by field name.
pub type FieldRecords = HashMap<FieldKey, DependencyRecord>;

/// Every subject that has had at least one field read.
pub type SubjectRecords = HashMap<SubjectId, FieldRecords>;
