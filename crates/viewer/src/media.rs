use url::Url;

/// What an embed shows, which decides how the viewer lays it out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    Image,
    AnimatedImage,
    /// Animated image delivered as a silent looping video.
    AnimatedVideo,
    Video,
    Audio,
    File,
}

impl MediaKind {
    pub fn is_supported(self) -> bool {
        !matches!(self, Self::Audio | Self::File)
    }

    /// Still and animated images are scaled to fit and can be dragged around.
    pub fn is_pannable(self) -> bool {
        matches!(self, Self::Image | Self::AnimatedImage)
    }
}

/// Last path segment of `url`, used as window title and suggested file name.
pub fn file_name(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut segments| segments.rfind(|segment| !segment.is_empty()))
        .map(str::to_owned)
        .unwrap_or_else(|| "download".to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(raw: &str) -> String {
        file_name(&Url::parse(raw).unwrap())
    }

    #[test]
    fn file_name_ignores_query_and_trailing_slash() {
        assert_eq!(
            name("https://cdn.example.com/attachments/42/cat.png?size=large"),
            "cat.png"
        );
        assert_eq!(name("https://cdn.example.com/clips/intro.mp4/"), "intro.mp4");
        assert_eq!(name("https://cdn.example.com/"), "download");
    }

    #[test]
    fn only_visual_kinds_are_supported() {
        assert!(MediaKind::AnimatedVideo.is_supported());
        assert!(!MediaKind::Audio.is_supported());
        assert!(!MediaKind::File.is_supported());
        assert!(MediaKind::AnimatedImage.is_pannable());
        assert!(!MediaKind::Video.is_pannable());
    }
}
