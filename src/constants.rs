/// Lifetime of a login token when JWT_TTL_HOURS is not set
pub const DEFAULT_JWT_TTL_HOURS: i64 = 12;

/// Viewer service that renders `/embed_single?token=...`
pub const DEFAULT_EMBED_BASE_URL: &str = "https://mediamtx.samdchti.uz";

/// Random bytes per camera access token (rendered as hex)
pub const ACCESS_TOKEN_BYTES: usize = 8;

/// Embedded player dimensions
pub const EMBED_WIDTH: u32 = 800;
pub const EMBED_HEIGHT: u32 = 450;

// =============================================================================
// Routing policy written for every camera
// =============================================================================

pub const RTSP_TRANSPORT: &str = "tcp";
pub const SOURCE_ON_DEMAND: bool = true;
pub const SOURCE_ON_DEMAND_CLOSE_AFTER: &str = "10s";

/// Top-level settings of a freshly created routing file
pub const DEFAULT_HLS_ADDRESS: &str = ":8888";
pub const DEFAULT_HLS_PART_DURATION: &str = "1s";
pub const DEFAULT_HLS_SEGMENT_DURATION: &str = "4s";

/// Separator between building and room in a room key
pub const ROOM_KEY_SEPARATOR: char = '/';

// =============================================================================
// Error Messages
// =============================================================================

pub const ERR_CREDENTIALS_REQUIRED: &str = "Username and password required";

pub const ERR_ADD_FIELDS_REQUIRED: &str = "name, url, room, and building are required";

pub const ERR_NAME_REQUIRED: &str = "name is required";

pub const ERR_RENAME_FIELDS_REQUIRED: &str = "old_name and new_name are required";

pub const ERR_ROOM_PART_HAS_SEPARATOR: &str = "building and room must not contain '/'";
