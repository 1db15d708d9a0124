use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    fn code(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    White,
    Black,
}

/// One of the 12 piece identities. Sprite files are named by [`Piece::code`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub side: Side,
}

const KINDS: [PieceKind; 6] = [
    PieceKind::Pawn,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Rook,
    PieceKind::Queen,
    PieceKind::King,
];

// Indexed like `Piece::ALL`.
const CODES: [&str; 12] = [
    "p_w", "n_w", "b_w", "r_w", "q_w", "k_w", "p_b", "n_b", "b_b", "r_b", "q_b", "k_b",
];

impl Piece {
    /// White pieces first, each color ordered pawn..king. Piece draws index this table.
    pub const ALL: [Piece; 12] = {
        let mut all = [Piece {
            kind: PieceKind::Pawn,
            side: Side::White,
        }; 12];
        let mut i = 0;
        while i < 12 {
            all[i] = Piece {
                kind: KINDS[i % 6],
                side: if i < 6 { Side::White } else { Side::Black },
            };
            i += 1;
        }
        all
    };

    pub const fn new(kind: PieceKind, side: Side) -> Self {
        Self { kind, side }
    }

    pub fn index(self) -> usize {
        let kind = KINDS.iter().position(|k| *k == self.kind).unwrap_or(0);
        match self.side {
            Side::White => kind,
            Side::Black => kind + 6,
        }
    }

    /// Short file-name code, e.g. `r_w` for a white rook.
    pub fn code(self) -> &'static str {
        CODES[self.index()]
    }

    pub fn from_code(code: &str) -> Option<Piece> {
        CODES
            .iter()
            .position(|c| *c == code)
            .map(|i| Piece::ALL[i])
    }

    pub fn sprite_file(self) -> String {
        format!("{}.png", self.code())
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = match self.side {
            Side::White => 'w',
            Side::Black => 'b',
        };
        write!(f, "{}_{}", self.kind.code(), side)
    }
}

/// Ground-truth class of a generated image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Label {
    Empty,
    Piece(Piece),
}

impl Label {
    pub const COUNT: usize = 13;
    pub const EMPTY_DIR: &'static str = "empty";

    /// Empty first, then `Piece::ALL` order.
    pub fn all() -> impl Iterator<Item = Label> {
        std::iter::once(Label::Empty).chain(Piece::ALL.into_iter().map(Label::Piece))
    }

    /// Position in [`Label::all`].
    pub fn index(self) -> usize {
        match self {
            Label::Empty => 0,
            Label::Piece(p) => 1 + p.index(),
        }
    }

    /// Name of the output directory holding images of this class.
    pub fn dir_name(self) -> &'static str {
        match self {
            Label::Empty => Self::EMPTY_DIR,
            Label::Piece(p) => p.code(),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.dir_name())
    }
}
