use std::sync::Arc;

use camino::Utf8PathBuf;
use cartograph::render::{draw_image, draw_zoom_levels_parallel};
use cartograph::style::{AreaStyle, Color, ElevationStyle, LabelStyle, LineStyle, Marker, NodeStyle, WayStyle};
use cartograph::{CancellationToken, Elevation, GeoPoint, GridResolution, ImageOptions, Map, SkiaCanvas, TileOptions};
use miette::IntoDiagnostic;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cartograph=info,xtask=info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: cargo xtask <command>");
        eprintln!("Commands:");
        eprintln!("  demo [OUT_DIR] [MAX_ZOOM]    Render a synthetic map to a tile pyramid and an overview");
        std::process::exit(1);
    }

    match args[1].as_str() {
        "demo" => {
            let out = args.get(2).map_or_else(|| Utf8PathBuf::from("demo-output"), Utf8PathBuf::from);
            let max_zoom = match args.get(3) {
                Some(z) => z.parse::<u8>().into_diagnostic()?,
                None => 9,
            };
            demo(out, max_zoom)
        }
        _ => {
            eprintln!("Unknown command: {}", args[1]);
            std::process::exit(1);
        }
    }
}

/// Alpine valley around a made-up lake
fn demo(out: Utf8PathBuf, max_zoom: u8) -> miette::Result<()> {
    let center = GeoPoint::new(46.5, 8.0);
    let mut map = Map::new();
    map.set_by_tile_cover(
        7,
        &[
            GeoPoint::new(center.lat + 0.4, center.lon - 0.6),
            GeoPoint::new(center.lat - 0.4, center.lon + 0.6),
        ],
    )?;
    map.set_background_color("#f2efe9".parse()?);

    let water = Arc::new(AreaStyle::new(7, "#aad3df".parse()?));
    let lake: Vec<GeoPoint> = (0..48)
        .map(|i| {
            let t = f64::from(i) / 48.0 * std::f64::consts::TAU;
            GeoPoint::new(center.lat + 0.05 * t.sin(), center.lon + 0.15 * t.cos())
        })
        .collect();
    map.add_area(&lake, water)?;

    let road = Arc::new(WayStyle::new(8, Color::rgb(200, 80, 40)).with_line(LineStyle::Solid, 1.5));
    let trail = Arc::new(
        WayStyle::new(10, Color::rgb(120, 80, 40))
            .with_line(LineStyle::Dashed, 0.8)
            .with_marker(Marker::Circle, 2.0),
    );
    map.add_way(
        &[
            GeoPoint::new(center.lat - 0.3, center.lon - 0.5),
            GeoPoint::new(center.lat - 0.06, center.lon - 0.1),
            GeoPoint::new(center.lat - 0.06, center.lon + 0.2),
            GeoPoint::new(center.lat + 0.3, center.lon + 0.5),
        ],
        road,
    )?;
    map.add_way(
        &[
            GeoPoint::new(center.lat + 0.06, center.lon),
            GeoPoint::new(center.lat + 0.15, center.lon + 0.05),
            GeoPoint::new(center.lat + 0.22, center.lon + 0.02),
        ],
        trail,
    )?;

    map.add_node(
        GeoPoint::new(center.lat - 0.07, center.lon - 0.12),
        Arc::new(NodeStyle::new(11, Color::rgb(0, 80, 200), "P")),
    )?;
    map.add_label("Lake Demo", center, Arc::new(LabelStyle::new(8, Color::rgb(30, 60, 120))))?;

    // Two gaussian peaks over a plain at 400 m
    let peaks = [(center.lat + 0.2, center.lon + 0.3, 2800.0), (center.lat - 0.25, center.lon - 0.3, 2100.0)];
    let mut samples = Vec::new();
    for i in 0..=40 {
        for j in 0..=40 {
            let lat = center.lat - 0.6 + 1.2 * f64::from(i) / 40.0;
            let lon = center.lon - 0.9 + 1.8 * f64::from(j) / 40.0;
            let height = peaks.iter().fold(400.0, |acc, &(plat, plon, h)| {
                let d2 = (lat - plat).powi(2) + (lon - plon).powi(2);
                acc + h * (-d2 / 0.03).exp()
            });
            samples.push((GeoPoint::new(lat, lon), height));
        }
    }
    let style = ElevationStyle::default().with_contour_zoom(9);
    map.add_elevation(Elevation::from_geo(samples, Arc::new(style))?);
    map.generate_elevation_grid(GridResolution { cols: 120, rows: 120 }, 20.0)?;

    let options = TileOptions::new(out.join("tiles")).with_zooms(7, Some(max_zoom.saturating_add(1)));
    let report = draw_zoom_levels_parallel(&mut map, &options, SkiaCanvas::new, &CancellationToken::new())?;
    info!(rendered = report.rendered, failed = report.failed.len(), "tile pyramid done");
    for failure in &report.failed {
        eprintln!("failed {}: {}", failure.path, failure.error);
    }

    let overview = ImageOptions::new(out.join("overview.png")).with_dpi(512);
    draw_image(&mut map, &overview, &mut SkiaCanvas::new())?;
    info!(path = %overview.path, "overview done");
    Ok(())
}
