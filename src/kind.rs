//! Handle kinds and their reference-count functions.
//!
//! Every opaque object the native library hands out belongs to one kind.
//! Each kind has a lowercase name from which its native reference-count
//! functions are named: `<name>_add_ref` and `<name>_release`.
//!
//! A kind is described twice: once for pointers the library hands over with
//! a reference already counted for the caller ([`Retention::Adopt`]), and
//! once for borrowed pointers that must be retained on construction
//! ([`Retention::Retain`]). Both descriptors of a kind belong to the same
//! family and compare equal.

use std::fmt;
use std::sync::OnceLock;

/// Implemented by the zero-sized kind markers in this module.
///
/// The marker is the type parameter of [`ManagedHandle`](crate::ManagedHandle),
/// so handles of different kinds are different types.
pub trait HandleKind: Send + Sync + 'static {
    const TAG: KindTag;
}

macro_rules! handle_kinds {
    ($($kind:ident => $name:literal),+ $(,)?) => {
        /// Closed set of handle kinds.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum KindTag {
            $($kind),+
        }

        impl KindTag {
            pub const ALL: &'static [KindTag] = &[$(KindTag::$kind),+];

            /// Lowercase name used to form native function names.
            pub fn name(self) -> &'static str {
                match self {
                    $(KindTag::$kind => $name),+
                }
            }

            /// Name of the kind's marker type.
            pub fn type_name(self) -> &'static str {
                match self {
                    $(KindTag::$kind => stringify!($kind)),+
                }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($name => Some(KindTag::$kind),)+
                    _ => None,
                }
            }
        }

        $(
            #[doc = concat!("Marker for `", $name, "` handles.")]
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            pub enum $kind {}

            impl HandleKind for $kind {
                const TAG: KindTag = KindTag::$kind;
            }
        )+
    };
}

handle_kinds! {
    Album => "album",
    AlbumBrowse => "albumbrowse",
    Artist => "artist",
    ArtistBrowse => "artistbrowse",
    Image => "image",
    Inbox => "inbox",
    Link => "link",
    Playlist => "playlist",
    PlaylistContainer => "playlistcontainer",
    Search => "search",
    ToplistBrowse => "toplistbrowse",
    Track => "track",
    User => "user",
}

impl fmt::Display for KindTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How a handle takes ownership of its native reference at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Retention {
    /// Take over a reference the native call already counted for us.
    #[default]
    Adopt,
    /// Increment the native reference count on construction.
    Retain,
}

/// Static metadata for one kind in one retention mode.
#[derive(Debug)]
pub struct KindDescriptor {
    tag: KindTag,
    retention: Retention,
    add_ref: String,
    release: String,
}

impl KindDescriptor {
    fn new(tag: KindTag, retention: Retention) -> Self {
        Self {
            tag,
            retention,
            add_ref: format!("{}_add_ref", tag.name()),
            release: format!("{}_release", tag.name()),
        }
    }

    pub fn tag(&self) -> KindTag {
        self.tag
    }

    pub fn name(&self) -> &'static str {
        self.tag.name()
    }

    /// Name of the native function that increments the reference count.
    pub fn add_ref_symbol(&self) -> &str {
        &self.add_ref
    }

    /// Name of the native function that decrements the reference count.
    pub fn release_symbol(&self) -> &str {
        &self.release
    }

    pub fn retention(&self) -> Retention {
        self.retention
    }

    pub fn retains_on_construction(&self) -> bool {
        self.retention == Retention::Retain
    }

    /// True when both descriptors describe the same kind, whatever their
    /// retention mode.
    pub fn same_family(&self, other: &KindDescriptor) -> bool {
        self.tag == other.tag
    }

    /// The retaining descriptor of this kind's family.
    pub fn retaining(&self) -> &'static KindDescriptor {
        descriptor(self.tag, Retention::Retain)
    }

    /// The non-retaining descriptor of this kind's family.
    pub fn adopting(&self) -> &'static KindDescriptor {
        descriptor(self.tag, Retention::Adopt)
    }
}

impl PartialEq for KindDescriptor {
    fn eq(&self, other: &Self) -> bool {
        self.same_family(other)
    }
}

impl Eq for KindDescriptor {}

struct Entry {
    adopting: KindDescriptor,
    retaining: OnceLock<KindDescriptor>,
}

struct Registry {
    entries: Vec<Entry>,
}

static REGISTRY: OnceLock<Registry> = OnceLock::new();

fn registry() -> &'static Registry {
    REGISTRY.get_or_init(|| {
        tracing::trace!(kinds = KindTag::ALL.len(), "building handle kind registry");
        Registry {
            entries: KindTag::ALL
                .iter()
                .map(|&tag| Entry {
                    adopting: KindDescriptor::new(tag, Retention::Adopt),
                    retaining: OnceLock::new(),
                })
                .collect(),
        }
    })
}

/// Descriptor for `tag` in the given retention mode.
///
/// Descriptors are created once per process; the retaining descriptor of a
/// kind is created on first request. Concurrent first access is safe and
/// every caller observes the same instance.
pub fn descriptor(tag: KindTag, retention: Retention) -> &'static KindDescriptor {
    let entry = &registry().entries[tag as usize];
    match retention {
        Retention::Adopt => &entry.adopting,
        Retention::Retain => entry
            .retaining
            .get_or_init(|| KindDescriptor::new(tag, Retention::Retain)),
    }
}
