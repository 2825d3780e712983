// Copyright 2025 Lars Brubaker
// Monotone region triangulation for Mesh.

use super::{sym, FaceClass, FaceIdx, Mesh, F_HEAD};
use crate::error::TessError;
use crate::geom::{edge_sign, vert_leq};

impl Mesh {
    /// Triangulates a face that is monotone in the sweep direction.
    ///
    /// The walk keeps `up` on the upper chain and `lo` on the lower chain,
    /// always advancing whichever side is further left, and cuts off every
    /// triangle that is convex (or whose far edge already goes left, which
    /// guarantees progress on slightly non-monotone input). The remainder is
    /// fanned from the rightmost vertex.
    pub fn tessellate_mono_region(&mut self, face: FaceIdx) -> Result<(), TessError> {
        let mut up = self.faces[face as usize].an_edge;
        if self.lnext(up) == up || self.lnext(self.lnext(up)) == up {
            return Err(TessError::Topology("monotone region has fewer than three edges"));
        }

        // Find the rightmost upper edge: its origin is the leftmost vertex
        // of the upper chain.
        while vert_leq(self.st(self.dst(up)), self.st(self.org(up))) {
            up = self.lprev(up);
        }
        while vert_leq(self.st(self.org(up)), self.st(self.dst(up))) {
            up = self.lnext(up);
        }
        let mut lo = self.lprev(up);

        while self.lnext(up) != lo {
            if vert_leq(self.st(self.dst(up)), self.st(self.org(lo))) {
                // up.dst is further left: cut triangles off at lo.org.
                while self.lnext(lo) != up
                    && (self.edge_goes_left(self.lnext(lo))
                        || edge_sign(
                            self.st(self.org(lo)),
                            self.st(self.dst(lo)),
                            self.st(self.dst(self.lnext(lo))),
                        ) <= 0.0)
                {
                    let e = self.connect(self.lnext(lo), lo);
                    lo = sym(e);
                }
                lo = self.lprev(lo);
            } else {
                // lo.org is further left: cut triangles off at up.dst.
                while self.lnext(lo) != up
                    && (self.edge_goes_right(self.lprev(up))
                        || edge_sign(
                            self.st(self.dst(up)),
                            self.st(self.org(up)),
                            self.st(self.org(self.lprev(up))),
                        ) >= 0.0)
                {
                    let e = self.connect(up, self.lprev(up));
                    up = sym(e);
                }
                up = self.lnext(up);
            }
        }

        // lo.org == up.dst is now the last unprocessed vertex; fan the rest.
        if self.lnext(lo) == up {
            return Err(TessError::Topology("monotone walk closed without a fan"));
        }
        while self.lnext(self.lnext(lo)) != up {
            let e = self.connect(self.lnext(lo), lo);
            lo = sym(e);
        }
        Ok(())
    }

    /// Triangulates every interior face. Faces created along the way are
    /// already triangles and are skipped.
    pub fn tessellate_interior(&mut self) -> Result<(), TessError> {
        let mut f = self.faces[F_HEAD as usize].next;
        while f != F_HEAD {
            let next = self.faces[f as usize].next;
            if self.faces[f as usize].class == FaceClass::Interior {
                self.tessellate_mono_region(f)?;
            }
            f = next;
        }
        Ok(())
    }
}
