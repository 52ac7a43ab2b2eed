// ============================================================================
// COLOR CHANNELS — isolate one of R/G/B, zero the other two
// ============================================================================

use image::RgbImage;
use rayon::prelude::*;

/// Which color-channel view is active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Channel {
    #[default]
    Original,
    Red,
    Green,
    Blue,
}

impl Channel {
    pub const ALL: [Channel; 4] = [
        Channel::Original,
        Channel::Red,
        Channel::Green,
        Channel::Blue,
    ];

    /// Translation key for the radio button label.
    pub fn label_key(&self) -> &'static str {
        match self {
            Channel::Original => "channel.original",
            Channel::Red => "channel.red",
            Channel::Green => "channel.green",
            Channel::Blue => "channel.blue",
        }
    }

    /// Subpixel index inside an RGB pixel, `None` for the untouched view.
    pub fn index(&self) -> Option<usize> {
        match self {
            Channel::Original => None,
            Channel::Red => Some(0),
            Channel::Green => Some(1),
            Channel::Blue => Some(2),
        }
    }
}

/// Returns a copy of `image` where only `channel` survives.
/// `Channel::Original` is a plain copy.
pub fn isolate_channel(image: &RgbImage, channel: Channel) -> RgbImage {
    let mut out = image.clone();
    let Some(keep) = channel.index() else {
        return out;
    };

    out.par_chunks_mut(3).for_each(|px| {
        for (i, sub) in px.iter_mut().enumerate() {
            if i != keep {
                *sub = 0;
            }
        }
    });
    out
}
