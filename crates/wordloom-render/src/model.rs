use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }
}

/// Bounding box of one rendered word. `(x, y)` is the top-left corner; y grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PlacementRect {
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn half_diagonal(&self) -> f64 {
        self.width.hypot(self.height) / 2.0
    }

    /// Axis-aligned overlap test. Rects that only share an edge do not intersect.
    pub fn intersects(&self, other: &PlacementRect) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// The area the word cloud may occupy: a rectangle plus a circle around its centroid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CloudRegion {
    pub bounds: Bounds,
    pub radius: f64,
}

impl CloudRegion {
    /// Uses the circle through the corners of `bounds`, so the rectangle is the binding limit
    /// near the edges and a max-size headline word still fits across the middle.
    pub fn new(bounds: Bounds) -> Self {
        let radius = (bounds.width().max(0.0).hypot(bounds.height().max(0.0)) / 2.0).max(0.0);
        Self { bounds, radius }
    }

    pub fn centroid(&self) -> (f64, f64) {
        (
            (self.bounds.min_x + self.bounds.max_x) / 2.0,
            (self.bounds.min_y + self.bounds.max_y) / 2.0,
        )
    }

    pub fn contains_rect(&self, r: &PlacementRect) -> bool {
        r.x >= self.bounds.min_x
            && r.y >= self.bounds.min_y
            && r.x + r.width <= self.bounds.max_x
            && r.y + r.height <= self.bounds.max_y
    }

    /// True when every corner of `r` lies inside the cloud circle.
    pub fn within_radius(&self, r: &PlacementRect) -> bool {
        let (cx, cy) = self.centroid();
        let (rx, ry) = r.center();
        (rx - cx).hypot(ry - cy) + r.half_diagonal() <= self.radius
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedWord {
    pub word: String,
    pub count: u32,
    /// Position in the frequency table (0 is the most frequent word).
    pub rank: usize,
    pub font_size: f64,
    pub fill: String,
    pub rect: PlacementRect,
    /// Text baseline origin (left edge).
    pub baseline_x: f64,
    pub baseline_y: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudLayout {
    pub region: CloudRegion,
    pub words: Vec<PlacedWord>,
    /// Words that found no free slot within the retry budget.
    pub dropped: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn as_svg(&self) -> &'static str {
        match self {
            TextAnchor::Start => "start",
            TextAnchor::Middle => "middle",
            TextAnchor::End => "end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageSlot {
    Qr,
    Logo,
}

/// One drawing step. A poster is the ordered list of these, painted back to front.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DrawCommand {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        corner_radius: f64,
        fill: String,
    },
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        stroke: String,
        stroke_width: f64,
    },
    Text {
        x: f64,
        y: f64,
        text: String,
        font_size: f64,
        bold: bool,
        fill: String,
        anchor: TextAnchor,
        letter_spacing: f64,
        /// Marks cloud words so consumers can style or count them.
        class: Option<String>,
    },
    Image {
        slot: ImageSlot,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PosterLayout {
    pub width: f64,
    pub height: f64,
    pub title: String,
    pub font_family: String,
    pub commands: Vec<DrawCommand>,
    pub cloud: CloudLayout,
}

impl PosterLayout {
    /// Fill of the full-canvas rect every poster starts with.
    pub fn background(&self) -> Option<&str> {
        match self.commands.first()? {
            DrawCommand::Rect { fill, .. } => Some(fill),
            _ => None,
        }
    }

    /// First family of the CSS font stack, without quotes.
    pub fn primary_font_family(&self) -> Option<&str> {
        self.font_family
            .split(',')
            .map(|f| f.trim().trim_matches(|c| c == '"' || c == '\''))
            .find(|f| !f.is_empty())
    }

    pub fn image_slots(&self) -> impl Iterator<Item = ImageSlot> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Image { slot, .. } => Some(*slot),
            _ => None,
        })
    }
}
