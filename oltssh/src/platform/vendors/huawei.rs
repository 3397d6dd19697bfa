//! Huawei MA5600-series OLT platform definition.
//!
//! # Prompt Examples
//!
//! ```text
//! MA5683T>                           # user mode after login
//! MA5683T#                           # privileged mode
//! MA5683T(config)#                   # global configuration
//! MA5683T(config-if-gpon-0/1)#       # GPON line card 0/1
//! ```
//!
//! Leaving privileged mode logs the user out after a confirmation:
//!
//! ```text
//! MA5683T#quit
//!   Check whether system data has been changed. Please save data before logout.
//!   Are you sure to log out? (y/n)[n]:y
//! ```

use crate::platform::OltPlatform;

/// Text the device prints when `quit` at the top level asks for confirmation.
pub const LOGOUT_CONFIRM: &str = "before logout";

/// Text the device prints once the logout went through.
pub const LOGOUT_DONE: &str = "to log on";

/// Yes/no confirmation prompt of destructive commands such as `ont delete`.
pub const YES_NO_PROMPT: &str = "(y/n)[n]:";

/// Create the MA5683T platform definition.
pub fn ma5683t() -> OltPlatform {
    OltPlatform::new("huawei_ma5683t", "MA5683T")
}
