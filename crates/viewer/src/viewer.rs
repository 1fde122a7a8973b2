use chatter_toast::ToastKind;
use url::Url;

use crate::controls::{Control, ControlBox, PackType, ViewerAction};
use crate::download::{self, DownloadOutcome, Notice};
use crate::error::ViewerError;
use crate::host::ViewerHost;
use crate::layout::{Adjustment, Size, fit_to_viewport};
use crate::media::{self, MediaKind};

/// Smallest window the viewer asks for.
pub const MIN_WINDOW_SIZE: Size = Size {
    width: 360,
    height: 360,
};

/// Modal window showing one embed at full size.
///
/// Pictures are scaled to fit whenever their natural size becomes known and
/// can be dragged around once the viewport is smaller than the picture.
/// Videos always fill the viewport and never scroll.
#[derive(Debug)]
pub struct Viewer {
    url: Url,
    kind: MediaKind,
    title: String,

    back_button: Control,
    show_back_button: bool,
    controls_start: ControlBox,
    controls_end: ControlBox,

    viewport: Size,
    display: Size,
    zoom: f64,
    horizontal: Adjustment,
    vertical: Adjustment,
    drag_origin: Option<(f64, f64)>,

    closed: bool,
}

impl Viewer {
    pub fn new(uri: &str, kind: MediaKind) -> Result<Self, ViewerError> {
        let url = Url::parse(uri).map_err(|source| ViewerError::InvalidUri {
            uri: uri.to_owned(),
            source,
        })?;
        if !kind.is_supported() {
            return Err(ViewerError::UnsupportedKind(kind));
        }

        let title = media::file_name(&url);
        log::debug!("viewer: opening {} as {:?}", title, kind);

        Ok(Self {
            url,
            kind,
            title,
            back_button: Control::for_action("Back", "go-previous-symbolic", ViewerAction::Close),
            show_back_button: true,
            controls_start: ControlBox::with_default_actions(),
            controls_end: ControlBox::new(),
            viewport: MIN_WINDOW_SIZE,
            display: Size::default(),
            zoom: 1.0,
            horizontal: Adjustment::default(),
            vertical: Adjustment::default(),
            drag_origin: None,
            closed: false,
        })
    }

    pub fn uri(&self) -> &str {
        self.url.as_str()
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// File name of the URI path, shown in the header bar.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn display_size(&self) -> Size {
        self.display
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn set_show_back_button(&mut self, show: bool) {
        self.show_back_button = show;
    }

    /// Buttons packed at the start of the header bar.
    pub fn header_start(&self) -> Option<&Control> {
        self.show_back_button.then_some(&self.back_button)
    }

    pub fn controls_start(&self) -> &ControlBox {
        &self.controls_start
    }

    pub fn controls_end(&self) -> &ControlBox {
        &self.controls_end
    }

    pub fn add_start_button(&mut self, pack: PackType, control: Control) {
        self.controls_start.add(pack, control);
    }

    pub fn add_end_button(&mut self, pack: PackType, control: Control) {
        self.controls_end.add(pack, control);
    }

    /// Resizes the scrolled area. Pictures keep their current zoom.
    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
        if !self.kind.is_pannable() {
            self.display = viewport;
        }
        self.configure_scroll();
    }

    /// Called once the natural size of the media is known.
    pub fn set_content_size(&mut self, content: Size) {
        if !self.kind.is_pannable() {
            self.display = self.viewport;
            self.configure_scroll();
            return;
        }

        let Some(fit) = fit_to_viewport(content, self.viewport) else {
            log::debug!("viewer: ignoring empty content size {:?}", content);
            return;
        };
        self.display = fit.display;
        self.zoom = fit.scale;
        self.configure_scroll();
    }

    fn configure_scroll(&mut self) {
        let (upper, page) = if self.kind.is_pannable() {
            (self.display, self.viewport)
        } else {
            (self.viewport, self.viewport)
        };
        self.horizontal
            .configure(f64::from(upper.width), f64::from(page.width));
        self.vertical
            .configure(f64::from(upper.height), f64::from(page.height));
    }

    pub fn scroll_offset(&self) -> (f64, f64) {
        (self.horizontal.value(), self.vertical.value())
    }

    /// Remembers the scroll position a drag gesture starts from.
    pub fn drag_begin(&mut self) {
        if self.kind.is_pannable() {
            self.drag_origin = Some(self.scroll_offset());
        }
    }

    /// Pans by the pointer offset since [`drag_begin`](Self::drag_begin).
    pub fn drag_update(&mut self, offset_x: f64, offset_y: f64) {
        let Some((origin_x, origin_y)) = self.drag_origin else {
            return;
        };
        self.horizontal.set_value(origin_x - offset_x);
        self.vertical.set_value(origin_y - offset_y);
    }

    pub fn drag_end(&mut self) {
        self.drag_origin = None;
    }

    /// Runs the action behind a button or shortcut.
    pub fn activate<H: ViewerHost + ?Sized>(&mut self, action: ViewerAction, host: &mut H) {
        log::debug!("viewer: {}", action);
        match action {
            ViewerAction::Close => self.close(),
            ViewerAction::Download => {
                self.download(host);
            }
            ViewerAction::CopyUrl => self.copy_url(host),
            ViewerAction::OpenOriginal => self.open_original(host),
        }
    }

    /// Like [`activate`](Self::activate) for an `embedviewer.*` action name.
    pub fn activate_named<H: ViewerHost + ?Sized>(&mut self, name: &str, host: &mut H) -> bool {
        match ViewerAction::from_name(name) {
            Some(action) => {
                self.activate(action, host);
                true
            }
            None => false,
        }
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    /// Saves the media where the user picks. Returns `None` when the save
    /// dialog was cancelled, in which case nothing is shown.
    ///
    /// The dialog, the request and the file write all block, so hosts with
    /// an event loop should call this off that loop.
    pub fn download<H: ViewerHost + ?Sized>(&mut self, host: &mut H) -> Option<DownloadOutcome> {
        let Some(path) = host.choose_save_path(&self.title) else {
            log::debug!("viewer: download cancelled");
            return None;
        };

        let outcome = download::save_to_path(host, self.url.as_str(), &path);
        host.notify(outcome.notice());
        Some(outcome)
    }

    pub fn copy_url<H: ViewerHost + ?Sized>(&mut self, host: &mut H) {
        match host.set_clipboard(self.url.as_str()) {
            Ok(()) => host.notify(Notice::new(ToastKind::Info, "Copied URL!")),
            Err(err) => {
                log::warn!("Failed to copy URL: {:#}", err);
                host.notify(Notice::new(ToastKind::Error, "Could not copy the URL"));
            }
        }
    }

    pub fn open_original<H: ViewerHost + ?Sized>(&mut self, host: &mut H) {
        if let Err(err) = host.open_uri(self.url.as_str()) {
            log::warn!("Failed to open {}: {:#}", self.url, err);
        }
    }
}
