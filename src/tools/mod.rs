mod classifier;
mod ffprobe_info;
mod filename_sanitizer;
mod fingerprint_index;
mod partial_hash;
mod path_validator;
mod video_metadata;
mod video_scanner;

pub use classifier::{
    Classification, FrameRateBucket, Orientation, ResolutionTier, apply_rotation_correction,
    classify, classify_frame_rate, classify_orientation, classify_resolution,
};
pub use ffprobe_info::{FfprobeProbe, parse_ffprobe_output};
pub use filename_sanitizer::{
    MAX_FILENAME_CHARS, sanitize_filename, sanitize_name_part, truncate_name_part,
};
pub use fingerprint_index::{DuplicateCheck, FingerprintIndex, FingerprintKey};
pub use partial_hash::{PARTIAL_HASH_WINDOW, calculate_partial_hash};
pub use path_validator::{ensure_directory_exists, is_path_occupied, validate_directory_exists};
pub use video_metadata::{MetadataProbe, VideoMetadata, normalize_rotation};
pub use video_scanner::{collect_video_files, scan_video_files};
