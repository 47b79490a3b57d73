// Tests for canvas projection

use roadnet_core::layout::{Canvas, Projection, round_to};

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn test_default_canvas() {
    let canvas = Canvas::default();
    assert_eq!(canvas.width, 750.0);
    assert_eq!(canvas.height, 550.0);
    assert_eq!(canvas.margin, 25.0);
    assert_eq!(canvas.padding, 0.1);
    assert!(canvas.validate().is_ok());
}

#[test]
fn test_canvas_without_room_is_invalid() {
    let canvas = Canvas {
        width: 50.0,
        height: 550.0,
        margin: 25.0,
        padding: 0.1,
    };
    assert!(canvas.validate().is_err());

    let negative = Canvas {
        padding: -0.5,
        ..Canvas::default()
    };
    assert!(negative.validate().is_err());
}

#[test]
fn test_fit_uses_smaller_scale() {
    let canvas = Canvas::default();
    let projection = Projection::fit(vec![(0.0, 0.0), (10.0, 10.0)], &canvas);

    // Padded range is 12 on both axes; height is the binding dimension
    assert!(approx(projection.min_x, -1.0));
    assert!(approx(projection.min_y, -1.0));
    assert!(approx(projection.scale, 500.0 / 12.0));

    assert_eq!(projection.project(0.0, 0.0), (66.67, 66.67));
    assert_eq!(projection.project(10.0, 10.0), (483.33, 483.33));
}

#[test]
fn test_fit_wide_region_binds_on_width() {
    let canvas = Canvas::default();
    let projection = Projection::fit(vec![(0.0, 0.0), (100.0, 1.0)], &canvas);
    assert!(approx(projection.scale, 700.0 / 120.0));

    let (x_max, _) = projection.project(100.0, 1.0);
    assert_eq!(x_max, 666.67);
}

#[test]
fn test_fit_empty_falls_back_to_unit_scale() {
    let projection = Projection::fit(Vec::<(f64, f64)>::new(), &Canvas::default());
    assert_eq!(projection.scale, 1.0);
    assert!(projection.scale.is_finite());
}

#[test]
fn test_fit_single_point_sits_on_margin() {
    let canvas = Canvas::default();
    let projection = Projection::fit(vec![(23.73, 37.98)], &canvas);
    assert_eq!(projection.scale, 1.0);
    assert_eq!(projection.project(23.73, 37.98), (25.0, 25.0));
}

#[test]
fn test_fit_degenerate_axis_uses_unit_scale_for_that_axis() {
    let canvas = Canvas::default();
    // All points share one latitude: y range is zero, so scale_y falls back to 1
    let projection = Projection::fit(vec![(0.0, 5.0), (0.001, 5.0)], &canvas);
    assert_eq!(projection.scale, 1.0);
}

#[test]
fn test_projected_points_stay_inside_canvas() {
    let canvas = Canvas::default();
    let points: Vec<(f64, f64)> = (0..200)
        .map(|i| {
            let t = i as f64;
            (23.72 + (t * 0.37).sin() * 0.01, 37.97 + (t * 0.11).cos() * 0.008)
        })
        .collect();

    let projection = Projection::fit(points.iter().copied(), &canvas);
    for (x, y) in points {
        let (px, py) = projection.project(x, y);
        assert!(canvas.contains(px, py, 0.01), "({}, {}) escaped the canvas", px, py);
    }
}

#[test]
fn test_round_to() {
    assert_eq!(round_to(1.23456, 2), 1.23);
    assert_eq!(round_to(1.235001, 2), 1.24);
    assert_eq!(round_to(19.96, 1), 20.0);
}
