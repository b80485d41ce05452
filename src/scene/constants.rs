// Compile-time style constants shared by every scene

/// Canvas size in abstract units; panel geometry is expressed in these
pub const CANVAS_WIDTH: f32 = 16.0;
pub const CANVAS_HEIGHT: f32 = 9.0;

/// Heap blocks start here, one page apart
pub const HEAP_BASE_ADDRESS: u64 = 0x55a1_1000;
pub const PAGE_SIZE: u64 = 0x1000;
pub const PAGE_SHIFT: u32 = 12;

/// Highest stack slot shown; slots grow downward in 4-byte steps
pub const STACK_TOP: u64 = 0x7ffd_1234;
pub const STACK_POINTER_NAME: &str = "ptr";

/// Registry row placement relative to the panel top
pub const REGISTRY_FIRST_ROW_Y: f32 = 0.62;
pub const REGISTRY_ROW_HEIGHT: f32 = 0.3;

pub const PROCESS_NAME: &str = "app.exe";
pub const PROCESS_PID: &str = "PID 1234";

pub const WRITTEN_VALUE: &str = "42";
pub const RESERVED_STATE: &str = "Reserved";

/// Default history budget for a scene (16 MB is far more than any script needs)
pub const SNAPSHOT_LIMIT: usize = 16 * 1024 * 1024;
