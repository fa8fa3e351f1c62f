//! File and pixel sinks for hellowave: JSON frame recording, the graphical
//! canvas target and MP4 export through ffmpeg.

pub mod canvas;
pub mod font;
pub mod muxer;
pub mod recording;
