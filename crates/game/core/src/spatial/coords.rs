//! Offset and cube coordinates for pointy-top hexes.
//!
//! Storage uses "odd-r" offset coordinates: odd rows are shoved half a hex to
//! the right. All geometry (distance, neighbors, lines) is computed in cube
//! space where `x + y + z == 0`.

/// Offset coordinates used to address nodes (`x` = column, `y` = row).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OffsetCoords {
    pub x: i32,
    pub y: i32,
}

impl OffsetCoords {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub const fn to_cube(self) -> CubeCoords {
        let x = self.x - (self.y - (self.y & 1)) / 2;
        let z = self.y;
        CubeCoords::new(x, -x - z, z)
    }
}

/// Cube coordinates; the three axes always sum to zero.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CubeCoords {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl CubeCoords {
    /// Unit offsets to the six neighbors, clockwise starting east.
    pub const DIRECTIONS: [CubeCoords; 6] = [
        CubeCoords::new(1, -1, 0),
        CubeCoords::new(1, 0, -1),
        CubeCoords::new(0, 1, -1),
        CubeCoords::new(-1, 1, 0),
        CubeCoords::new(-1, 0, 1),
        CubeCoords::new(0, -1, 1),
    ];

    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    pub const fn to_offset(self) -> OffsetCoords {
        let col = self.x + (self.z - (self.z & 1)) / 2;
        OffsetCoords::new(col, self.z)
    }

    pub const fn add(self, other: CubeCoords) -> CubeCoords {
        CubeCoords::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    /// Hex distance: `(|dx| + |dy| + |dz|) / 2`.
    pub const fn distance_to(self, other: CubeCoords) -> u32 {
        let dx = (self.x - other.x).unsigned_abs();
        let dy = (self.y - other.y).unsigned_abs();
        let dz = (self.z - other.z).unsigned_abs();
        (dx + dy + dz) / 2
    }

    pub fn neighbors(self) -> [CubeCoords; 6] {
        Self::DIRECTIONS.map(|direction| self.add(direction))
    }

    /// Hexes crossed by the straight segment from `self` to `other`, both ends included.
    ///
    /// Consecutive entries are always adjacent. The start point is nudged by a
    /// tiny epsilon so samples that land exactly on an edge round consistently.
    pub fn line_to(self, other: CubeCoords) -> Vec<CubeCoords> {
        let n = self.distance_to(other);
        if n == 0 {
            return vec![self];
        }

        const EPSILON: (f64, f64, f64) = (1e-6, 2e-6, -3e-6);
        let (ax, ay, az) = (
            self.x as f64 + EPSILON.0,
            self.y as f64 + EPSILON.1,
            self.z as f64 + EPSILON.2,
        );
        let (bx, by, bz) = (other.x as f64, other.y as f64, other.z as f64);

        let mut results = Vec::with_capacity(n as usize + 1);
        for i in 0..=n {
            let t = i as f64 / n as f64;
            results.push(Self::round(
                ax + (bx - ax) * t,
                ay + (by - ay) * t,
                az + (bz - az) * t,
            ));
        }
        results
    }

    /// Round fractional cube coordinates to the nearest hex.
    fn round(x: f64, y: f64, z: f64) -> Self {
        let mut rx = x.round();
        let mut ry = y.round();
        let mut rz = z.round();

        let x_diff = (rx - x).abs();
        let y_diff = (ry - y).abs();
        let z_diff = (rz - z).abs();

        if x_diff > y_diff && x_diff > z_diff {
            rx = -ry - rz;
        } else if y_diff > z_diff {
            ry = -rx - rz;
        } else {
            rz = -rx - ry;
        }

        Self::new(rx as i32, ry as i32, rz as i32)
    }
}
