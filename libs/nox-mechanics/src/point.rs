//! Points, their relative positions, and their motion in reference frames.
use std::{
    collections::{HashMap, VecDeque},
    fmt,
    hash::{Hash, Hasher},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};

use nox_frames::{ReferenceFrame, Vector};
use nox_sym::Expr;
use parking_lot::RwLock;
use tracing::debug;

use crate::{Error, Result};

static NEXT_GRAPH_UID: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PointId(usize);

#[derive(Default)]
struct State {
    names: Vec<String>,
    by_name: HashMap<String, PointId>,
    /// `pos[(a, b)]` is the position of `a` relative to `b`.
    pos: HashMap<(PointId, PointId), Vector>,
    adj: Vec<Vec<PointId>>,
    vel: HashMap<(PointId, ReferenceFrame), Vector>,
    acc: HashMap<(PointId, ReferenceFrame), Vector>,
}

impl State {
    fn name(&self, id: PointId) -> String {
        self.names.get(id.0).cloned().unwrap_or_default()
    }

    fn shortest_path(&self, from: PointId, to: PointId) -> Option<Vec<PointId>> {
        let mut prev = vec![None; self.adj.len()];
        let mut queue = VecDeque::from([from]);
        prev[from.0] = Some(from);
        while let Some(node) = queue.pop_front() {
            if node == to {
                let mut path = vec![to];
                let mut cur = to;
                while cur != from {
                    cur = prev[cur.0]?;
                    path.push(cur);
                }
                path.reverse();
                return Some(path);
            }
            for next in &self.adj[node.0] {
                if prev[next.0].is_none() {
                    prev[next.0] = Some(node);
                    queue.push_back(*next);
                }
            }
        }
        None
    }
}

struct Inner {
    uid: u64,
    state: RwLock<State>,
}

/// A shared set of points connected by position vectors.
#[derive(Clone)]
pub struct PointGraph(Arc<Inner>);

impl Default for PointGraph {
    fn default() -> Self {
        PointGraph::new()
    }
}

impl PointGraph {
    pub fn new() -> Self {
        PointGraph(Arc::new(Inner {
            uid: NEXT_GRAPH_UID.fetch_add(1, Ordering::Relaxed),
            state: RwLock::new(State::default()),
        }))
    }

    /// Creates a point with no position, velocity or acceleration.
    pub fn point(&self, name: impl Into<String>) -> Result<Point> {
        let name = name.into();
        let mut state = self.0.state.write();
        if state.by_name.contains_key(&name) {
            return Err(Error::DuplicateName(name));
        }
        let id = PointId(state.names.len());
        state.names.push(name.clone());
        state.by_name.insert(name.clone(), id);
        state.adj.push(Vec::new());
        drop(state);
        debug!(point = %name, "created point");
        Ok(Point {
            graph: self.clone(),
            id,
        })
    }

    pub fn get(&self, name: &str) -> Option<Point> {
        let id = self.0.state.read().by_name.get(name).copied()?;
        Some(Point {
            graph: self.clone(),
            id,
        })
    }

    pub fn len(&self) -> usize {
        self.0.state.read().names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A handle to a point of a [`PointGraph`].
#[derive(Clone)]
pub struct Point {
    graph: PointGraph,
    id: PointId,
}

impl Point {
    pub fn id(&self) -> PointId {
        self.id
    }

    pub fn name(&self) -> String {
        self.graph.0.state.read().name(self.id)
    }

    /// Creates a new point located at `position` relative to `self`.
    pub fn locate_new(&self, name: impl Into<String>, position: &Vector) -> Result<Point> {
        let point = self.graph.point(name)?;
        point.set_pos(self, position)?;
        Ok(point)
    }

    /// Sets the position of `self` relative to `other`.
    pub fn set_pos(&self, other: &Point, value: &Vector) -> Result<()> {
        self.check_same_graph(other)?;
        let mut state = self.graph.0.state.write();
        state.pos.insert((self.id, other.id), value.clone());
        state.pos.insert((other.id, self.id), -value);
        if !state.adj[self.id.0].contains(&other.id) {
            state.adj[self.id.0].push(other.id);
            state.adj[other.id.0].push(self.id);
        }
        debug!(point = %state.name(self.id), other = %state.name(other.id), "set position");
        Ok(())
    }

    /// Position of `self` relative to `other`, summed along the shortest
    /// chain of known positions.
    pub fn pos_from(&self, other: &Point) -> Result<Vector> {
        self.check_same_graph(other)?;
        let state = self.graph.0.state.read();
        let no_path = || Error::NoPath {
            from: state.name(self.id),
            to: state.name(other.id),
        };
        let path = state.shortest_path(self.id, other.id).ok_or_else(no_path)?;
        let mut out = Vector::zero();
        for step in path.windows(2) {
            out += state.pos.get(&(step[0], step[1])).ok_or_else(no_path)?;
        }
        Ok(out)
    }

    pub fn set_vel(&self, frame: &ReferenceFrame, value: &Vector) {
        self.graph
            .0
            .state
            .write()
            .vel
            .insert((self.id, frame.clone()), value.clone());
    }

    /// Velocity of `self` in `frame`. Fails when none has been set or derived.
    pub fn vel(&self, frame: &ReferenceFrame) -> Result<Vector> {
        let state = self.graph.0.state.read();
        state
            .vel
            .get(&(self.id, frame.clone()))
            .cloned()
            .ok_or_else(|| Error::UndefinedVelocity {
                point: state.name(self.id),
                frame: frame.name(),
            })
    }

    pub fn set_acc(&self, frame: &ReferenceFrame, value: &Vector) {
        self.graph
            .0
            .state
            .write()
            .acc
            .insert((self.id, frame.clone()), value.clone());
    }

    /// Acceleration of `self` in `frame`: the explicit value if one was set,
    /// otherwise the time derivative of the velocity in `frame`.
    pub fn acc(&self, frame: &ReferenceFrame) -> Result<Vector> {
        let explicit = self
            .graph
            .0
            .state
            .read()
            .acc
            .get(&(self.id, frame.clone()))
            .cloned();
        match explicit {
            Some(acc) => Ok(acc),
            None => Ok(self.vel(frame)?.dt(frame)?),
        }
    }

    /// Two-point velocity theorem for points fixed in `fixed_frame`.
    ///
    /// Sets and returns `v = v_other + w x r`, where `w` is the angular
    /// velocity of `fixed_frame` in `out_frame` and `r` the position of
    /// `self` from `other`.
    pub fn v2pt_theory(
        &self,
        other: &Point,
        out_frame: &ReferenceFrame,
        fixed_frame: &ReferenceFrame,
    ) -> Result<Vector> {
        let dist = self.pos_from(other)?;
        let omega = fixed_frame.ang_vel_in(out_frame)?;
        let v = other.vel(out_frame)? + omega.cross(&dist)?;
        self.set_vel(out_frame, &v);
        Ok(v)
    }

    /// Two-point acceleration theorem for points fixed in `fixed_frame`.
    pub fn a2pt_theory(
        &self,
        other: &Point,
        out_frame: &ReferenceFrame,
        fixed_frame: &ReferenceFrame,
    ) -> Result<Vector> {
        let dist = self.pos_from(other)?;
        let omega = fixed_frame.ang_vel_in(out_frame)?;
        let alpha = fixed_frame.ang_acc_in(out_frame)?;
        let a = other.acc(out_frame)? + alpha.cross(&dist)? + omega.cross(&omega.cross(&dist)?)?;
        self.set_acc(out_frame, &a);
        Ok(a)
    }

    /// One-point velocity theorem for `self` moving in `interm_frame`.
    pub fn v1pt_theory(
        &self,
        other: &Point,
        out_frame: &ReferenceFrame,
        interm_frame: &ReferenceFrame,
    ) -> Result<Vector> {
        let dist = self.pos_from(other)?;
        let v1 = self.vel(interm_frame)?;
        let v2 = other.vel(out_frame)?;
        let omega = interm_frame.ang_vel_in(out_frame)?;
        let v = v1 + v2 + omega.cross(&dist)?;
        self.set_vel(out_frame, &v);
        Ok(v)
    }

    /// One-point acceleration theorem for `self` moving in `interm_frame`,
    /// including the Coriolis term.
    pub fn a1pt_theory(
        &self,
        other: &Point,
        out_frame: &ReferenceFrame,
        interm_frame: &ReferenceFrame,
    ) -> Result<Vector> {
        let dist = self.pos_from(other)?;
        let a1 = self.acc(interm_frame)?;
        let a2 = other.acc(out_frame)?;
        let v = self.vel(interm_frame)?;
        let omega = interm_frame.ang_vel_in(out_frame)?;
        let alpha = interm_frame.ang_acc_in(out_frame)?;
        let coriolis = Expr::int(2) * omega.cross(&v)?;
        let a = a2
            + a1
            + coriolis
            + alpha.cross(&dist)?
            + omega.cross(&omega.cross(&dist)?)?;
        self.set_acc(out_frame, &a);
        Ok(a)
    }

    fn check_same_graph(&self, other: &Point) -> Result<()> {
        if self.graph.0.uid == other.graph.0.uid {
            Ok(())
        } else {
            Err(Error::NoPath {
                from: self.name(),
                to: other.name(),
            })
        }
    }
}

impl PartialEq for Point {
    fn eq(&self, other: &Self) -> bool {
        self.graph.0.uid == other.graph.0.uid && self.id == other.id
    }
}

impl Eq for Point {}

impl Hash for Point {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.graph.0.uid.hash(state);
        self.id.hash(state);
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

impl fmt::Debug for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point({})", self.name())
    }
}
