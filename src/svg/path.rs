//! SVG path data (`d` attribute) parsing.
//!
//! Every command of the SVG grammar is accepted and lowered to a small
//! absolute command set: move, line, quadratic, cubic and close. Relative
//! commands are resolved against the current point, `H`/`V` become lines,
//! `S`/`T` get their reflected control points, and arcs are converted to
//! cubic curves.

use super::arc::arc_to_cubics;
use crate::error::{IconforgeError, Result};
use crate::geometry::{solve_quadratic, Point, Rect, Transform};

/// An absolute path command.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PathCommand {
    MoveTo(Point),
    LineTo(Point),
    /// Control point, end point.
    QuadTo(Point, Point),
    /// First control, second control, end point.
    CubicTo(Point, Point, Point),
    ClosePath,
}

/// A sequence of absolute path commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Path {
    pub commands: Vec<PathCommand>,
}

impl Path {
    pub fn new(commands: Vec<PathCommand>) -> Self {
        Self { commands }
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// False once any coordinate has overflowed to infinity or NaN.
    pub fn is_finite(&self) -> bool {
        self.commands.iter().all(|cmd| match *cmd {
            PathCommand::MoveTo(p) | PathCommand::LineTo(p) => p.is_finite(),
            PathCommand::QuadTo(c, p) => c.is_finite() && p.is_finite(),
            PathCommand::CubicTo(c1, c2, p) => c1.is_finite() && c2.is_finite() && p.is_finite(),
            PathCommand::ClosePath => true,
        })
    }

    pub fn extend(&mut self, other: Path) {
        self.commands.extend(other.commands);
    }

    /// Apply an affine transform to every point. Bézier curves are
    /// affine-invariant, so transforming control points is exact.
    pub fn transform(&mut self, t: &Transform) {
        if t.is_identity() {
            return;
        }
        for cmd in &mut self.commands {
            match cmd {
                PathCommand::MoveTo(p) | PathCommand::LineTo(p) => *p = t.apply(*p),
                PathCommand::QuadTo(c, p) => {
                    *c = t.apply(*c);
                    *p = t.apply(*p);
                }
                PathCommand::CubicTo(c1, c2, p) => {
                    *c1 = t.apply(*c1);
                    *c2 = t.apply(*c2);
                    *p = t.apply(*p);
                }
                PathCommand::ClosePath => {}
            }
        }
    }

    /// Tight bounding box of the drawn outline, including curve extrema.
    /// Returns `None` for a path without any points.
    pub fn bounds(&self) -> Option<Rect> {
        let mut rect: Option<Rect> = None;
        let mut include = |p: Point| match rect.as_mut() {
            Some(r) => r.include(p),
            None => rect = Some(Rect::from_point(p)),
        };

        let mut current = Point::ZERO;
        let mut start = Point::ZERO;
        for cmd in &self.commands {
            match *cmd {
                PathCommand::MoveTo(p) => {
                    include(p);
                    current = p;
                    start = p;
                }
                PathCommand::LineTo(p) => {
                    include(p);
                    current = p;
                }
                PathCommand::QuadTo(c, p) => {
                    for t in quad_extrema(current, c, p) {
                        include(eval_quad(current, c, p, t));
                    }
                    include(p);
                    current = p;
                }
                PathCommand::CubicTo(c1, c2, p) => {
                    for t in cubic_extrema(current, c1, c2, p) {
                        include(eval_cubic(current, c1, c2, p, t));
                    }
                    include(p);
                    current = p;
                }
                PathCommand::ClosePath => current = start,
            }
        }
        rect
    }
}

fn eval_quad(p0: Point, p1: Point, p2: Point, t: f64) -> Point {
    let mt = 1.0 - t;
    p0 * (mt * mt) + p1 * (2.0 * mt * t) + p2 * (t * t)
}

fn eval_cubic(p0: Point, p1: Point, p2: Point, p3: Point, t: f64) -> Point {
    let mt = 1.0 - t;
    p0 * (mt * mt * mt) + p1 * (3.0 * mt * mt * t) + p2 * (3.0 * mt * t * t) + p3 * (t * t * t)
}

fn quad_extrema(p0: Point, p1: Point, p2: Point) -> Vec<f64> {
    let mut ts = Vec::new();
    for (a, b, c) in [(p0.x, p1.x, p2.x), (p0.y, p1.y, p2.y)] {
        let denom = a - 2.0 * b + c;
        if denom != 0.0 {
            let t = (a - b) / denom;
            if t > 0.0 && t < 1.0 {
                ts.push(t);
            }
        }
    }
    ts
}

fn cubic_extrema(p0: Point, p1: Point, p2: Point, p3: Point) -> Vec<f64> {
    let mut ts = Vec::new();
    for (a, b, c, d) in [(p0.x, p1.x, p2.x, p3.x), (p0.y, p1.y, p2.y, p3.y)] {
        // derivative / 3 = qa·t² + qb·t + qc
        let qa = -a + 3.0 * b - 3.0 * c + d;
        let qb = 2.0 * (a - 2.0 * b + c);
        let qc = b - a;
        ts.extend(
            solve_quadratic(qa, qb, qc)
                .into_iter()
                .filter(|t| *t > 0.0 && *t < 1.0),
        );
    }
    ts
}

// ─── Parser ─────────────────────────────────────────────────────

/// Parse an SVG path `d` attribute into absolute commands.
///
/// Unknown command letters are fatal (`UnsupportedCommand`), as are
/// malformed numbers or missing arguments.
pub fn parse_path_data(d: &str) -> Result<Path> {
    let mut lexer = Lexer::new(d);
    let mut state = PathState::default();
    let mut command: Option<u8> = None;

    loop {
        lexer.skip_separators();
        let Some(next) = lexer.peek() else { break };

        if next.is_ascii_alphabetic() {
            lexer.pos += 1;
            if !b"MmLlHhVvCcSsQqTtAaZz".contains(&next) {
                return Err(IconforgeError::UnsupportedCommand(next as char));
            }
            if next == b'Z' || next == b'z' {
                state.close();
                command = None;
                continue;
            }
            command = Some(next);
        } else if command.is_none() {
            return Err(lexer.error("expected a path command"));
        }

        let Some(cmd) = command else { break };
        state.apply(cmd, &mut lexer)?;

        // Coordinate pairs following a moveto are implicit linetos.
        command = match cmd {
            b'M' => Some(b'L'),
            b'm' => Some(b'l'),
            other => Some(other),
        };
    }

    Ok(Path::new(state.commands))
}

#[derive(Default)]
struct PathState {
    commands: Vec<PathCommand>,
    current: Point,
    start: Point,
    /// Second control point of the previous C/S, for S reflection.
    last_cubic_ctrl: Option<Point>,
    /// Control point of the previous Q/T, for T reflection.
    last_quad_ctrl: Option<Point>,
}

impl PathState {
    fn apply(&mut self, cmd: u8, lexer: &mut Lexer<'_>) -> Result<()> {
        let relative = cmd.is_ascii_lowercase();
        let origin = if relative { self.current } else { Point::ZERO };
        let mut cubic_ctrl = None;
        let mut quad_ctrl = None;

        match cmd.to_ascii_uppercase() {
            b'M' => {
                let p = origin + lexer.point()?;
                self.commands.push(PathCommand::MoveTo(p));
                self.current = p;
                self.start = p;
            }
            b'L' => {
                let p = origin + lexer.point()?;
                self.line_to(p);
            }
            b'H' => {
                let x = lexer.number()? + origin.x;
                self.line_to(Point::new(x, self.current.y));
            }
            b'V' => {
                let y = lexer.number()? + origin.y;
                self.line_to(Point::new(self.current.x, y));
            }
            b'C' => {
                let c1 = origin + lexer.point()?;
                let c2 = origin + lexer.point()?;
                let p = origin + lexer.point()?;
                self.commands.push(PathCommand::CubicTo(c1, c2, p));
                self.current = p;
                cubic_ctrl = Some(c2);
            }
            b'S' => {
                let c1 = self.reflect(self.last_cubic_ctrl);
                let c2 = origin + lexer.point()?;
                let p = origin + lexer.point()?;
                self.commands.push(PathCommand::CubicTo(c1, c2, p));
                self.current = p;
                cubic_ctrl = Some(c2);
            }
            b'Q' => {
                let c = origin + lexer.point()?;
                let p = origin + lexer.point()?;
                self.commands.push(PathCommand::QuadTo(c, p));
                self.current = p;
                quad_ctrl = Some(c);
            }
            b'T' => {
                let c = self.reflect(self.last_quad_ctrl);
                let p = origin + lexer.point()?;
                self.commands.push(PathCommand::QuadTo(c, p));
                self.current = p;
                quad_ctrl = Some(c);
            }
            b'A' => {
                let rx = lexer.number()?;
                let ry = lexer.number()?;
                let rotation = lexer.number()?;
                let large_arc = lexer.flag()?;
                let sweep = lexer.flag()?;
                let p = origin + lexer.point()?;
                match arc_to_cubics(self.current, rx, ry, rotation, large_arc, sweep, p) {
                    Some(curves) => {
                        for [c1, c2, end] in curves {
                            self.commands.push(PathCommand::CubicTo(c1, c2, end));
                        }
                    }
                    None => self.commands.push(PathCommand::LineTo(p)),
                }
                self.current = p;
            }
            other => return Err(IconforgeError::UnsupportedCommand(other as char)),
        }

        self.last_cubic_ctrl = cubic_ctrl;
        self.last_quad_ctrl = quad_ctrl;
        Ok(())
    }

    fn line_to(&mut self, p: Point) {
        self.commands.push(PathCommand::LineTo(p));
        self.current = p;
    }

    fn reflect(&self, ctrl: Option<Point>) -> Point {
        match ctrl {
            Some(c) => self.current * 2.0 - c,
            None => self.current,
        }
    }

    fn close(&mut self) {
        if !self.commands.is_empty() {
            self.commands.push(PathCommand::ClosePath);
        }
        self.current = self.start;
        self.last_cubic_ctrl = None;
        self.last_quad_ctrl = None;
    }
}

struct Lexer<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(s: &'a str) -> Self {
        Self {
            bytes: s.as_bytes(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.pos).copied()
    }

    fn skip_separators(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_ascii_whitespace() || c == b',' {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    fn error(&self, message: &str) -> IconforgeError {
        IconforgeError::InvalidPathData {
            position: self.pos,
            message: message.to_string(),
        }
    }

    fn point(&mut self) -> Result<Point> {
        let x = self.number()?;
        let y = self.number()?;
        Ok(Point::new(x, y))
    }

    /// Scan one number. Handles compact forms like `1.5.5` (two numbers)
    /// and `10-5` (two numbers).
    fn number(&mut self) -> Result<f64> {
        self.skip_separators();
        let start = self.pos;

        if matches!(self.peek(), Some(b'+') | Some(b'-')) {
            self.pos += 1;
        }
        let int_digits = self.digits();
        let mut frac_digits = 0;
        if self.peek() == Some(b'.') {
            self.pos += 1;
            frac_digits = self.digits();
        }
        if int_digits == 0 && frac_digits == 0 {
            self.pos = start;
            return Err(self.error("expected a number"));
        }
        if matches!(self.peek(), Some(b'e') | Some(b'E')) {
            let save = self.pos;
            self.pos += 1;
            if matches!(self.peek(), Some(b'+') | Some(b'-')) {
                self.pos += 1;
            }
            if self.digits() == 0 {
                self.pos = save;
            }
        }

        let value = std::str::from_utf8(&self.bytes[start..self.pos])
            .ok()
            .and_then(|s| s.parse::<f64>().ok())
            .ok_or_else(|| IconforgeError::InvalidPathData {
                position: start,
                message: "malformed number".to_string(),
            })?;
        if !value.is_finite() {
            return Err(IconforgeError::InvalidPathData {
                position: start,
                message: "number out of range".to_string(),
            });
        }
        Ok(value)
    }

    /// Arc flags are single `0`/`1` characters and may be written
    /// without separators (`a1 1 0 00 1 1`).
    fn flag(&mut self) -> Result<bool> {
        self.skip_separators();
        match self.peek() {
            Some(b'0') => {
                self.pos += 1;
                Ok(false)
            }
            Some(b'1') => {
                self.pos += 1;
                Ok(true)
            }
            _ => Err(self.error("expected an arc flag")),
        }
    }

    fn digits(&mut self) -> usize {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit()) {
            self.pos += 1;
        }
        self.pos - start
    }
}
