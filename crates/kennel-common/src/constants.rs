//! System-wide constants for KennelDB.

// =============================================================================
// Tables
// =============================================================================

/// Canonical name of the owners table.
pub const OWNERS_TABLE: &str = "owners";

/// Canonical name of the dogs table.
pub const DOGS_TABLE: &str = "dogs";

/// Column layout of the owners table.
///
/// The owner ID is supplied by the caller on every insert.
pub const OWNERS_COLUMNS: [&str; 2] = ["owner_id", "owner_name"];

/// Column layout of the dogs table.
///
/// `dog_id` is assigned by the store; callers supply the remaining three.
pub const DOGS_COLUMNS: [&str; 4] = ["dog_id", "breed", "dog_name", "owner_id"];

/// Position of the auto-incremented `dog_id` column.
pub const DOG_ID_COLUMN: usize = 0;

/// Position of the indexed `breed` column.
pub const BREED_COLUMN: usize = 1;

/// Position of the `dog_name` column.
pub const DOG_NAME_COLUMN: usize = 2;

/// Position of the `owner_id` column in the dogs table.
pub const DOG_OWNER_COLUMN: usize = 3;

// =============================================================================
// Index
// =============================================================================

/// Order of the breed index: the key count at which a node splits.
pub const DEFAULT_INDEX_ORDER: usize = 4;

/// Smallest order accepted by the index.
///
/// Below 3 a split cannot leave both halves non-empty.
pub const MIN_INDEX_ORDER: usize = 3;

// =============================================================================
// Text format
// =============================================================================

/// Separator between cells of a stored row.
pub const CELL_SEPARATOR: char = ',';

/// Separator between stored rows.
pub const ROW_SEPARATOR: char = '\n';

/// Separator between statements of one submission.
pub const STATEMENT_SEPARATOR: char = ';';
