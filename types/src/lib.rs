pub mod combined;
pub mod nonstandard;

pub mod phase0 {
    pub mod consts;
    pub mod containers;
    pub mod primitives;
}

pub mod electra {
    pub mod containers;
}
