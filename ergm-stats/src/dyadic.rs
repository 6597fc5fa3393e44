//! Dyadic covariate and attribute-interaction change statistics.
//!
//! Dyadic covariates are functions of the two endpoints' continuous
//! attributes only (distances); they do not depend on the arc set at all,
//! so their change statistic is the covariate value itself. Missing
//! coordinates contribute zero.

use ergm_graph::{Graph, CAT_NA};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in km between the endpoints' (latitude,
/// longitude) coordinates, in degrees.
pub fn change_geo_distance(g: &Graph, i: u32, j: u32, lat: usize, lon: usize) -> f64 {
    let lat1 = g.attrs.contattr[lat][i as usize];
    let lon1 = g.attrs.contattr[lon][i as usize];
    let lat2 = g.attrs.contattr[lat][j as usize];
    let lon2 = g.attrs.contattr[lon][j as usize];
    if lat1.is_nan() || lon1.is_nan() || lat2.is_nan() || lon2.is_nan() {
        return 0.0;
    }
    let (phi1, phi2) = (lat1.to_radians(), lat2.to_radians());
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Natural log of the great-circle distance; zero for coincident points.
pub fn change_log_geo_distance(g: &Graph, i: u32, j: u32, lat: usize, lon: usize) -> f64 {
    let d = change_geo_distance(g, i, j, lat, lon);
    if d > 0.0 {
        d.ln()
    } else {
        0.0
    }
}

/// Euclidean distance between the endpoints' (x, y) coordinates.
pub fn change_euclidean_distance(g: &Graph, i: u32, j: u32, x: usize, y: usize) -> f64 {
    let xi = g.attrs.contattr[x][i as usize];
    let yi = g.attrs.contattr[y][i as usize];
    let xj = g.attrs.contattr[x][j as usize];
    let yj = g.attrs.contattr[y][j as usize];
    if xi.is_nan() || yi.is_nan() || xj.is_nan() || yj.is_nan() {
        return 0.0;
    }
    ((xi - xj).powi(2) + (yi - yj).powi(2)).sqrt()
}

/// Both categorical attributes match across the dyad.
pub fn change_matching_interaction(g: &Graph, i: u32, j: u32, a: usize, b: usize) -> f64 {
    let ai = g.attrs.catattr[a][i as usize];
    let aj = g.attrs.catattr[a][j as usize];
    let bi = g.attrs.catattr[b][i as usize];
    let bj = g.attrs.catattr[b][j as usize];
    if ai == CAT_NA || aj == CAT_NA || bi == CAT_NA || bj == CAT_NA {
        return 0.0;
    }
    if ai == aj && bi == bj {
        1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ergm_graph::io;
    use std::io::Write as _;

    fn graph_with_coords() -> Graph {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        // Zurich, Lugano, somewhere unknown
        f.write_all(b"lat lon\n47.37 8.54\n46.01 8.96\nNA NA\n")
            .unwrap();
        let mut g = Graph::new(3, true);
        io::load_contattr(&mut g.attrs, f.path().to_str().unwrap(), 3).unwrap();
        g
    }

    #[test]
    fn test_geo_distance() {
        let g = graph_with_coords();
        let d = change_geo_distance(&g, 0, 1, 0, 1);
        // Zurich-Lugano is roughly 155 km great-circle
        assert!((d - 155.0).abs() < 10.0, "d = {}", d);
        assert_eq!(change_geo_distance(&g, 0, 0, 0, 1), 0.0);
        assert_eq!(change_geo_distance(&g, 0, 2, 0, 1), 0.0); // NA
        assert_eq!(change_log_geo_distance(&g, 0, 0, 0, 1), 0.0);
    }

    #[test]
    fn test_euclidean_distance() {
        let mut g = Graph::new(2, true);
        g.attrs.contattr_names = vec!["x".into(), "y".into()];
        g.attrs.contattr = vec![vec![0.0, 3.0], vec![0.0, 4.0]];
        assert!((change_euclidean_distance(&g, 0, 1, 0, 1) - 5.0).abs() < 1e-12);
    }
}
