//! Whitespace-separated text persistence for domains.
//!
//! Format: `N  p1.x p1.y e1  …  pN.x pN.y eN  Mp+x Mp-x Mp+y Mp-y  density`
//! where `e` is the integer support code of the outline edge leaving the
//! point. Loading rebuilds the outline, applies the yield moments,
//! discretises at the stored density and sets a unit live load.

use std::path::Path;

use super::{Domain, YieldMoments};
use crate::error::Error;
use crate::geom::{EdgeKind, Vec2};

impl Domain {
    /// Write the outline, yield moments and target density.
    pub fn save(&self, path: &Path, density: f64) -> Result<(), Error> {
        let mut out = String::new();
        out.push_str(&format!("{} ", self.poly.num_points()));
        for i in 0..self.poly.num_points() {
            let p = self.poly.point(i);
            out.push_str(&format!("{} {} {} ", p.x, p.y, self.poly.kind(i).code()));
        }
        let m = self.moments;
        out.push_str(&format!(
            "{} {} {} {} {}",
            m.pos_x, m.neg_x, m.pos_y, m.neg_y, density
        ));
        std::fs::write(path, out)?;
        Ok(())
    }

    /// Read a domain file and return the discretised domain with a unit
    /// live load.
    pub fn load(path: &Path) -> Result<Domain, Error> {
        let text = std::fs::read_to_string(path)?;
        let mut tokens = text.split_whitespace();
        let parse_err = |msg: &str| Error::Parse {
            path: path.to_path_buf(),
            msg: msg.to_string(),
        };

        let mut next_f64 = |what: &str| -> Result<f64, Error> {
            tokens
                .next()
                .ok_or_else(|| parse_err(&format!("missing {what}")))?
                .parse::<f64>()
                .map_err(|_| parse_err(&format!("malformed {what}")))
        };

        let count = next_f64("point count")? as usize;
        let mut domain = Domain::new();
        for i in 0..count {
            let x = next_f64(&format!("point {i} x"))?;
            let y = next_f64(&format!("point {i} y"))?;
            let code = next_f64(&format!("point {i} edge code"))? as u32;
            let kind = EdgeKind::from_code(code)
                .ok_or_else(|| parse_err(&format!("unknown edge code {code}")))?;
            domain.add_boundary_point(Vec2::new(x, y), kind);
        }

        let moments = YieldMoments::new(
            next_f64("Mp+x")?,
            next_f64("Mp-x")?,
            next_f64("Mp+y")?,
            next_f64("Mp-y")?,
        );
        let density = next_f64("density")?;

        domain.set_yield_moments(moments);
        domain.discretize(density)?;
        domain.set_loads(1.0, 0.0);
        Ok(domain)
    }
}
