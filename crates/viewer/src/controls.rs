use std::fmt;

/// Actions the viewer installs under the `embedviewer` prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViewerAction {
    Close,
    Download,
    CopyUrl,
    OpenOriginal,
}

impl ViewerAction {
    pub const ALL: [Self; 4] = [Self::Close, Self::Download, Self::CopyUrl, Self::OpenOriginal];

    pub fn name(self) -> &'static str {
        match self {
            Self::Close => "embedviewer.close",
            Self::Download => "embedviewer.download",
            Self::CopyUrl => "embedviewer.copy-url",
            Self::OpenOriginal => "embedviewer.open-original",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|action| action.name() == name)
    }
}

impl fmt::Display for ViewerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a button goes inside a control cluster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackType {
    Start,
    End,
    Top,
    Bottom,
}

/// Style classes for buttons floating over the media.
pub const CONTROL_STYLES: &[&str] = &["osd", "circular"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Control {
    pub tooltip: String,
    pub icon: String,
    pub action: Option<ViewerAction>,
    pub styles: Vec<String>,
}

impl Control {
    /// A caller-provided button that does not trigger a viewer action.
    pub fn new(tooltip: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            tooltip: tooltip.into(),
            icon: icon.into(),
            action: None,
            styles: Vec::new(),
        }
    }

    pub fn for_action(tooltip: &str, icon: &str, action: ViewerAction) -> Self {
        Self {
            action: Some(action),
            ..Self::new(tooltip, icon)
        }
    }

    pub fn with_styles(mut self, styles: &[&str]) -> Self {
        self.styles = styles.iter().map(|style| style.to_string()).collect();
        self
    }
}

/// A row of buttons floating in one bottom corner of the viewer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlBox {
    controls: Vec<Control>,
}

impl ControlBox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open original, download and copy URL, in that order.
    pub fn with_default_actions() -> Self {
        let mut controls = Self::new();
        for control in [
            Control::for_action("Open Original", "earth-symbolic", ViewerAction::OpenOriginal),
            Control::for_action("Download", "folder-download-symbolic", ViewerAction::Download),
            Control::for_action("Copy URL", "edit-copy-symbolic", ViewerAction::CopyUrl),
        ] {
            controls.add(PackType::End, control.with_styles(CONTROL_STYLES));
        }
        controls
    }

    /// `Start` and `Top` prepend, `End` and `Bottom` append.
    pub fn add(&mut self, pack: PackType, control: Control) {
        match pack {
            PackType::Start | PackType::Top => self.controls.insert(0, control),
            PackType::End | PackType::Bottom => self.controls.push(control),
        }
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tooltips(controls: &ControlBox) -> Vec<&str> {
        controls
            .controls()
            .iter()
            .map(|control| control.tooltip.as_str())
            .collect()
    }

    #[test]
    fn action_names_resolve_back() {
        for action in ViewerAction::ALL {
            assert_eq!(ViewerAction::from_name(action.name()), Some(action));
        }
        assert_eq!(ViewerAction::from_name("embedviewer.zoom"), None);
        assert_eq!(ViewerAction::CopyUrl.to_string(), "embedviewer.copy-url");
    }

    #[test]
    fn default_cluster_order() {
        let controls = ControlBox::with_default_actions();
        assert_eq!(tooltips(&controls), vec!["Open Original", "Download", "Copy URL"]);
        assert!(controls.controls().iter().all(|c| c.styles == ["osd", "circular"]));
    }

    #[test]
    fn pack_type_decides_position() {
        let mut controls = ControlBox::new();
        controls.add(PackType::End, Control::new("b", "icon"));
        controls.add(PackType::Start, Control::new("a", "icon"));
        controls.add(PackType::Bottom, Control::new("c", "icon"));
        controls.add(PackType::Top, Control::new("first", "icon"));
        assert_eq!(tooltips(&controls), vec!["first", "a", "b", "c"]);
    }
}
