//! Constants used throughout the registry core crate.

/// Default listen address for the REST surface.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Default site name reported by health checks.
pub const DEFAULT_SITE_NAME: &str = "registry.dev";

/// Minimum password strength (on a 0..=1 scale) required when none is configured.
pub const DEFAULT_MINIMUM_PASSWORD_STRENGTH: f64 = 0.3;

/// Submitted and rendered date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub const TRUE_TOKEN: &str = "True";
pub const FALSE_TOKEN: &str = "False";

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const NOT_A_VALID_CHOICE_MESSAGE: &str = "Not a valid choice";

/// Value of the patient form's `next_action` field that asks for an episode to be created next.
pub const NEXT_ACTION_CREATE_EPISODE: &str = "CreateEpisode";
