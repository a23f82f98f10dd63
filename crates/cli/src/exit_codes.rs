//! CLI Exit Code Registry
//!
//! Single source of truth for `vsync` exit codes. Scripts rely on them.
//!
//! | Code | Meaning                                         |
//! |------|-------------------------------------------------|
//! | 0    | Success (including a failed write-back)         |
//! | 1    | General error (unspecified)                     |
//! | 2    | Usage error (bad arguments, no gateway URL)     |
//! | 3    | Source file not found                           |
//! | 4    | Source file unreadable or missing sheet/columns |
//! | 5    | Remote directory (QuickBooks gateway) failure   |
//! | 6    | Report could not be written                     |
//! | 7    | Settings file unreadable or malformed           |
//!
//! New codes: add the constant, update the table, wire it into
//! [`sync_exit_code`] or the command that raises it.

use vendorsync_recon::SyncError;

/// Success - command completed; write-back warnings do not change this.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, missing required options.
pub const EXIT_USAGE: u8 = 2;

/// Source workbook or CSV does not exist.
pub const EXIT_NOT_FOUND: u8 = 3;

/// Source exists but cannot be read as a vendor table.
pub const EXIT_FORMAT: u8 = 4;

/// Connecting to or querying the remote directory failed.
pub const EXIT_GATEWAY: u8 = 5;

/// Report file could not be written.
pub const EXIT_PERSISTENCE: u8 = 6;

/// Settings file could not be read or parsed.
pub const EXIT_CONFIG: u8 = 7;

pub fn sync_exit_code(err: &SyncError) -> u8 {
    match err {
        SyncError::NotFound(_) => EXIT_NOT_FOUND,
        SyncError::Format(_) => EXIT_FORMAT,
        SyncError::Gateway(_) => EXIT_GATEWAY,
        SyncError::Persistence { .. } => EXIT_PERSISTENCE,
    }
}
