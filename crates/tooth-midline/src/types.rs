//! Plain mesh containers: positions, index triples and a by-value triangle.

use nalgebra::{Point3, Unit, Vector3};

/// One scanned point. Units follow the input file (usually millimeters).
#[derive(Debug, Clone, PartialEq)]
pub struct Vertex {
    pub position: Point3<f64>,
}

impl Vertex {
    #[inline]
    pub fn new(position: Point3<f64>) -> Self {
        Self { position }
    }

    #[inline]
    pub fn from_coords(x: f64, y: f64, z: f64) -> Self {
        Vertex {
            position: [x, y, z].into(),
        }
    }
}

/// Indexed triangle soup as read from disk.
///
/// Nothing here is checked. [`crate::MeshModel`] owns the validated form
/// and the derived caches.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    /// Vertex id `i` is `vertices[i]`.
    pub vertices: Vec<Vertex>,
    /// Index triples; face id `f` is `faces[f]`. Winding sets the normal side.
    pub faces: Vec<[u32; 3]>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(vertices: usize, faces: usize) -> Self {
        Mesh {
            vertices: Vec::with_capacity(vertices),
            faces: Vec::with_capacity(faces),
        }
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// True when there is nothing to analyze: no vertices or no faces.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty() || self.vertices.is_empty()
    }

    /// Axis-aligned `(min, max)` corners, `None` without vertices.
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let mut points = self.vertices.iter().map(|v| v.position);
        let seed = points.next()?;
        Some(points.fold((seed, seed), |(lo, hi), p| (lo.inf(&p), hi.sup(&p))))
    }

    /// Mean vertex position, `None` without vertices.
    pub fn centroid(&self) -> Option<Point3<f64>> {
        if self.vertices.is_empty() {
            return None;
        }
        let total: Vector3<f64> = self.vertices.iter().map(|v| v.position.coords).sum();
        Some(Point3::from(total / self.vertices.len() as f64))
    }

    /// Every face as a [`Triangle`], in face-id order.
    ///
    /// Indexes without checks; only call on a validated mesh.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.faces.iter().map(move |face| {
            let [a, b, c] = face.map(|i| self.vertices[i as usize].position);
            Triangle::new(a, b, c)
        })
    }

    /// Face `face` as a [`Triangle`], `None` for a bad face id or vertex index.
    pub fn triangle(&self, face: usize) -> Option<Triangle> {
        let corner = |i: u32| self.vertices.get(i as usize).map(|v| v.position);
        let [a, b, c] = *self.faces.get(face)?;
        Some(Triangle::new(corner(a)?, corner(b)?, corner(c)?))
    }
}

/// Three corner positions, copied out of a [`Mesh`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub v0: Point3<f64>,
    pub v1: Point3<f64>,
    pub v2: Point3<f64>,
}

impl Triangle {
    #[inline]
    pub fn new(v0: Point3<f64>, v1: Point3<f64>, v2: Point3<f64>) -> Self {
        Self { v0, v1, v2 }
    }

    /// `(v1 - v0) x (v2 - v0)`: twice the area, pointing out of the front side.
    #[inline]
    pub fn cross(&self) -> Vector3<f64> {
        (self.v1 - self.v0).cross(&(self.v2 - self.v0))
    }

    /// Unit normal by the right-hand rule, `None` when the area vanishes.
    pub fn normal(&self) -> Option<Unit<Vector3<f64>>> {
        Unit::try_new(self.cross(), f64::EPSILON.sqrt())
    }

    #[inline]
    pub fn area(&self) -> f64 {
        0.5 * self.cross().norm()
    }

    #[inline]
    pub fn centroid(&self) -> Point3<f64> {
        Point3::from((self.v0.coords + self.v1.coords + self.v2.coords) / 3.0)
    }

    /// Scale the triangle about its own centroid.
    ///
    /// Each corner moves to `c + factor * (v - c)`; the centroid is fixed.
    pub fn scaled_about_centroid(&self, factor: f64) -> Triangle {
        let c = self.centroid();
        let scale = |p: Point3<f64>| c + (p - c) * factor;
        Triangle::new(scale(self.v0), scale(self.v1), scale(self.v2))
    }

    /// Closest point on the triangle (interior, edges or corners) to `p`.
    ///
    /// Voronoi-region walk from Ericson, *Real-Time Collision Detection* 5.1.5.
    /// Degenerate triangles fall back to the closest point on their edges.
    pub fn closest_point(&self, p: &Point3<f64>) -> Point3<f64> {
        if self.normal().is_none() {
            return self
                .edges()
                .iter()
                .map(|(a, b)| closest_point_on_segment(p, a, b))
                .min_by(|x, y| (x - p).norm_squared().total_cmp(&(y - p).norm_squared()))
                .unwrap_or(self.v0);
        }

        let (a, b, c) = (self.v0, self.v1, self.v2);
        let ab = b - a;
        let ac = c - a;

        let ap = p - a;
        let d1 = ab.dot(&ap);
        let d2 = ac.dot(&ap);
        if d1 <= 0.0 && d2 <= 0.0 {
            return a;
        }

        let bp = p - b;
        let d3 = ab.dot(&bp);
        let d4 = ac.dot(&bp);
        if d3 >= 0.0 && d4 <= d3 {
            return b;
        }

        let vc = d1 * d4 - d3 * d2;
        if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
            let v = d1 / (d1 - d3);
            return a + ab * v;
        }

        let cp = p - c;
        let d5 = ab.dot(&cp);
        let d6 = ac.dot(&cp);
        if d6 >= 0.0 && d5 <= d6 {
            return c;
        }

        let vb = d5 * d2 - d1 * d6;
        if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
            let w = d2 / (d2 - d6);
            return a + ac * w;
        }

        let va = d3 * d6 - d5 * d4;
        if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
            let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
            return b + (c - b) * w;
        }

        let denom = 1.0 / (va + vb + vc);
        let v = vb * denom;
        let w = vc * denom;
        a + ab * v + ac * w
    }

    /// Squared distance from `p` to the triangle.
    #[inline]
    pub fn distance_squared(&self, p: &Point3<f64>) -> f64 {
        (self.closest_point(p) - p).norm_squared()
    }

    /// Sides in winding order.
    pub fn edges(&self) -> [(Point3<f64>, Point3<f64>); 3] {
        [(self.v0, self.v1), (self.v1, self.v2), (self.v2, self.v0)]
    }
}

fn closest_point_on_segment(p: &Point3<f64>, a: &Point3<f64>, b: &Point3<f64>) -> Point3<f64> {
    let ab = b - a;
    let len_sq = ab.norm_squared();
    if len_sq <= f64::EPSILON * f64::EPSILON {
        return *a;
    }
    let t = ((p - a).dot(&ab) / len_sq).clamp(0.0, 1.0);
    a + ab * t
}
