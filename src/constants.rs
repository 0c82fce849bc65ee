// Host page wiring: element ids, storage keys and packing layout.

// Loader overlay elements
pub const LOADER_OVERLAY_ID: &str = "loader-overlay";
pub const LOADER_FILL_ID: &str = "loader-fill";
pub const LOADER_TEXT_ID: &str = "loader-progress";

// Per-tab session flag so the loader shows once per visit
pub const LOADER_SEEN_KEY: &str = "cl_loader_seen";
pub const LOADER_SEEN_VALUE: &str = "1";

// Scroll container that spans the story pages; falls back to the window
pub const SCROLL_CONTAINER_ID: &str = "story-scroll";

// Frame packing: header floats before the transform blocks
pub const FRAME_HEADER_FLOATS: usize = 13;
