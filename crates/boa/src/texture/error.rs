use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("image {} could not be loaded: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("image {} has no pixels", path.display())]
    Empty { path: PathBuf },

    #[error("image {} is {width}x{height}, over the device limit of {max}", path.display())]
    TooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max: u32,
    },
}
