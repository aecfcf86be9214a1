#![forbid(unsafe_code)]

pub mod assets;
pub mod effects;
pub mod export;
pub mod foundation;
pub mod render;
pub mod search;
pub mod session;
pub mod text;

pub use assets::{
    decode::{SourceImage, decode_image},
    source::{
        ImageLoader, ImageSelection, LoadTicket, load_from_data_uri, load_from_path, load_from_url,
    },
};
pub use effects::pixel::{EffectFlags, apply_effects};
pub use export::{DEFAULT_FILE_NAME, save_png, to_data_uri, to_png};
pub use foundation::{
    core::{Dimensions, Point, Rgba8},
    error::{MemeError, MemeResult},
};
pub use render::{
    canvas::{Canvas, TextStyle},
    compositor::{Compositor, RenderSummary, bounded_size},
    config::{CompositorOptions, RenderConfig},
    cpu::CpuCanvas,
};
pub use search::{
    client::{EMPTY_QUERY_MESSAGE, NO_RESULTS_MESSAGE, SearchClient},
    model::{Attribution, SearchImage, SearchResponse},
    proxy::{ProxyConfig, router, serve},
    upstream::{PhotoSearch, UNSPLASH_API_BASE, UnsplashClient},
};
pub use session::{EditorSession, LOAD_ERROR_MESSAGE, LoadOutcome};
pub use text::{
    engine::TextEngine,
    fonts::{FontLibrary, default_font_dirs},
    wrap::{TextMeasure, draw_text, wrap_lines},
};
