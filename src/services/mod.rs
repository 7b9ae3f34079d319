pub mod audio;
pub mod baidu;
pub mod encoding;
pub mod format;
pub mod json_io;
pub mod meanings;
pub mod normalize;
pub mod pokemon;
pub mod translation_cache;
pub mod translator;
