//! Canvas view controller: scale and pan.
//!
//! An explicit object passed by reference to whichever component needs to
//! drive the canvas, instead of accessor functions hung off a global. Pure
//! geometry; rendering stays elsewhere.

use riveter_types::StepNode;

/// Zoom bounds and step, in percent.
const MIN_PERCENT: i32 = 50;
const MAX_PERCENT: i32 = 200;
const STEP_PERCENT: i32 = 10;

/// Nominal on-canvas footprint of a node, used by fit-to-view.
const NODE_WIDTH: f64 = 200.0;
const NODE_HEIGHT: f64 = 120.0;

#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    scale: f64,
    pan: (f64, f64),
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            scale: 1.0,
            pan: (0.0, 0.0),
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn pan(&self) -> (f64, f64) {
        self.pan
    }

    /// Zoom level as a whole percentage, as shown in the menu bar.
    pub fn percent(&self) -> i32 {
        (self.scale * 100.0).round() as i32
    }

    /// Set the scale, clamped to the supported range.
    pub fn set_scale(&mut self, scale: f64) {
        let percent = (scale * 100.0).round() as i32;
        self.scale = f64::from(percent.clamp(MIN_PERCENT, MAX_PERCENT)) / 100.0;
    }

    pub fn set_pan(&mut self, x: f64, y: f64) {
        self.pan = (x, y);
    }

    /// One zoom-in step around the given focus point.
    pub fn zoom_in(&mut self, center: (f64, f64)) {
        let next = f64::from((self.percent() + STEP_PERCENT).min(MAX_PERCENT)) / 100.0;
        self.zoom_to(next, center);
    }

    /// One zoom-out step around the given focus point.
    pub fn zoom_out(&mut self, center: (f64, f64)) {
        let next = f64::from((self.percent() - STEP_PERCENT).max(MIN_PERCENT)) / 100.0;
        self.zoom_to(next, center);
    }

    /// Change scale while keeping `center` (in view coordinates) fixed on the
    /// same canvas point.
    pub fn zoom_to(&mut self, scale: f64, center: (f64, f64)) {
        let old = self.scale;
        self.set_scale(scale);
        let ratio = self.scale / old;
        self.pan = (
            center.0 - (center.0 - self.pan.0) * ratio,
            center.1 - (center.1 - self.pan.1) * ratio,
        );
    }

    /// Back to 100% with no pan.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Fit every node inside a view of `width` x `height`, centered, with the
    /// scale clamped to the zoom range. An empty graph resets the view.
    pub fn fit(&mut self, nodes: &[StepNode], width: f64, height: f64) {
        let Some(first) = nodes.first() else {
            self.reset();
            return;
        };

        let mut min_x = first.position.x;
        let mut min_y = first.position.y;
        let mut max_x = first.position.x + NODE_WIDTH;
        let mut max_y = first.position.y + NODE_HEIGHT;
        for node in &nodes[1..] {
            min_x = min_x.min(node.position.x);
            min_y = min_y.min(node.position.y);
            max_x = max_x.max(node.position.x + NODE_WIDTH);
            max_y = max_y.max(node.position.y + NODE_HEIGHT);
        }

        let bbox_w = max_x - min_x;
        let bbox_h = max_y - min_y;
        // Unrounded clamp: percent rounding could push the box past the view.
        self.scale = (width / bbox_w).min(height / bbox_h).clamp(
            f64::from(MIN_PERCENT) / 100.0,
            f64::from(MAX_PERCENT) / 100.0,
        );

        // Center the bounding box in the view.
        self.pan = (
            (width - bbox_w * self.scale) / 2.0 - min_x * self.scale,
            (height - bbox_h * self.scale) / 2.0 - min_y * self.scale,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use riveter_types::{ConfigMap, Position};

    fn node_at(x: f64, y: f64) -> StepNode {
        StepNode {
            id: format!("node-{x}-{y}"),
            kind: "run".into(),
            name: "Run".into(),
            position: Position::new(x, y),
            config: ConfigMap::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    #[test]
    fn scale_clamps_to_range() {
        let mut v = Viewport::new();
        v.set_scale(5.0);
        assert_eq!(v.percent(), 200);
        v.set_scale(0.1);
        assert_eq!(v.percent(), 50);
    }

    #[test]
    fn zoom_steps_by_ten_percent() {
        let mut v = Viewport::new();
        v.zoom_in((0.0, 0.0));
        assert_eq!(v.percent(), 110);
        v.zoom_out((0.0, 0.0));
        v.zoom_out((0.0, 0.0));
        assert_eq!(v.percent(), 90);
    }

    #[test]
    fn zoom_saturates_at_bounds() {
        let mut v = Viewport::new();
        for _ in 0..20 {
            v.zoom_in((0.0, 0.0));
        }
        assert_eq!(v.percent(), 200);
        for _ in 0..40 {
            v.zoom_out((0.0, 0.0));
        }
        assert_eq!(v.percent(), 50);
    }

    #[test]
    fn zoom_to_keeps_focus_point_fixed() {
        let mut v = Viewport::new();
        v.set_pan(10.0, 20.0);
        let center = (400.0, 300.0);

        // Canvas point under the focus before zooming.
        let before = (
            (center.0 - v.pan().0) / v.scale(),
            (center.1 - v.pan().1) / v.scale(),
        );
        v.zoom_to(1.5, center);
        let after = (
            (center.0 - v.pan().0) / v.scale(),
            (center.1 - v.pan().1) / v.scale(),
        );

        assert!((before.0 - after.0).abs() < 1e-9);
        assert!((before.1 - after.1).abs() < 1e-9);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut v = Viewport::new();
        v.zoom_in((100.0, 100.0));
        v.set_pan(-50.0, 75.0);
        v.reset();
        assert_eq!(v, Viewport::default());
    }

    #[test]
    fn fit_empty_graph_resets() {
        let mut v = Viewport::new();
        v.set_pan(99.0, 99.0);
        v.fit(&[], 800.0, 600.0);
        assert_eq!(v, Viewport::default());
    }

    #[test]
    fn fit_contains_all_nodes() {
        let mut v = Viewport::new();
        let nodes = vec![node_at(0.0, 0.0), node_at(900.0, 400.0)];
        v.fit(&nodes, 800.0, 600.0);

        // Both extreme corners must land inside the view.
        for (x, y) in [(0.0, 0.0), (900.0 + 200.0, 400.0 + 120.0)] {
            let vx = x * v.scale() + v.pan().0;
            let vy = y * v.scale() + v.pan().1;
            assert!((-1e-6..=800.0 + 1e-6).contains(&vx), "x out of view: {vx}");
            assert!((-1e-6..=600.0 + 1e-6).contains(&vy), "y out of view: {vy}");
        }
    }
}
