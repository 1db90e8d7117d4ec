// Wrapper generators for the box catalog. Every concrete box is a typed
// wrapper over any carrier implementing `BoxRead` (owned `BoxBuf` by
// default, or a borrowed view), so read accessors work zero-copy on views
// while mutation stays with owners.

macro_rules! box_wrapper {
    ($(#[$attr:meta])* $name:ident, $tag:expr) => {
        $(#[$attr])*
        pub struct $name<B = crate::boxed::BoxBuf> {
            b: B,
        }

        impl<B> $name<B> {
            pub const TAG: crate::boxed::FourCC = crate::boxed::FourCC(*$tag);

            pub fn into_inner(self) -> B { self.b }
        }

        impl<B: crate::boxed::BoxRead> $name<B> {
            /// Wrap an existing record, checking its type tag.
            pub fn from_box(b: B) -> crate::error::Result<Self> {
                if b.box_type() != Self::TAG {
                    return Err(crate::error::BoxError::WrongType {
                        expected: Self::TAG,
                        found: b.box_type(),
                    });
                }
                Ok(Self { b })
            }
        }

        impl<B: crate::boxed::BoxRead> crate::boxed::BoxRead for $name<B> {
            fn as_bytes(&self) -> &[u8] { self.b.as_bytes() }
        }

        impl<B: crate::boxed::BoxWrite> crate::boxed::BoxWrite for $name<B> {
            fn as_bytes_mut(&mut self) -> &mut [u8] { self.b.as_bytes_mut() }

            fn reserve(&mut self, position: usize, current: usize, wanted: usize) -> crate::error::Result<()> {
                self.b.reserve(position, current, wanted)
            }
        }
    };
}

macro_rules! full_box {
    ($(#[$attr:meta])* $name:ident, $tag:expr) => {
        box_wrapper!($(#[$attr])* $name, $tag);

        impl<B: crate::boxed::BoxRead> crate::full::VersionFlags for $name<B> {}
        impl<B: crate::boxed::BoxWrite> crate::full::VersionFlagsMut for $name<B> {}
    };
}

macro_rules! container_box {
    ($(#[$attr:meta])* $name:ident, $tag:expr, $display:expr) => {
        box_wrapper!($(#[$attr])* $name, $tag);

        impl<B: crate::boxed::BoxRead> crate::container::ChildSequence for $name<B> {}
        impl<B: crate::boxed::BoxWrite> crate::container::ChildSequenceMut for $name<B> {}

        impl<B: crate::boxed::BoxRead> $name<B> {
            pub fn to_pretty_string(&self, indent: usize) -> String {
                crate::pretty::container_string($display, self, indent)
            }
        }

        impl $name {
            /// Fresh, empty container.
            pub fn new() -> Self {
                Self { b: crate::boxed::BoxBuf::new(Self::TAG) }
            }
        }

        impl Default for $name {
            fn default() -> Self { Self::new() }
        }
    };
}
