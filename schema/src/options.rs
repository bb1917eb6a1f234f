//! Option bitmasks and protocol constants.

/// Server kind reported in the handshake response.
pub const DATA_SERVER: i32 = 1;

/// Load-balancing server kind reported in the handshake response.
pub const LOAD_BALANCING_SERVER: i32 = 0;

/// Server attribute flags reported in a `kXR_protocol` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ServerFlags(i32);

impl ServerFlags {
    pub const IS_SERVER: i32 = 0x0000_0001;
    pub const IS_MANAGER: i32 = 0x0000_0002;
    pub const ATTR_META: i32 = 0x0000_0100;
    pub const ATTR_PROXY: i32 = 0x0000_0200;
    pub const ATTR_SUPER: i32 = 0x0000_0400;

    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }

    #[must_use]
    pub const fn is_server(self) -> bool {
        self.0 & Self::IS_SERVER != 0
    }

    #[must_use]
    pub const fn is_manager(self) -> bool {
        self.0 & Self::IS_MANAGER != 0
    }
}

/// Options of a `kXR_open` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OpenOptions(u16);

impl OpenOptions {
    pub const COMPRESS: u16 = 1;
    pub const DELETE: u16 = 2;
    pub const FORCE: u16 = 4;
    pub const NEW: u16 = 8;
    pub const OPEN_READ: u16 = 16;
    pub const OPEN_UPDT: u16 = 32;
    pub const ASYNC: u16 = 64;
    pub const REFRESH: u16 = 128;
    pub const MKPATH: u16 = 256;
    pub const OPEN_APND: u16 = 512;
    pub const RETSTAT: u16 = 1024;
    pub const REPLICA: u16 = 2048;
    pub const POSC: u16 = 4096;
    pub const NOWAIT: u16 = 8192;
    pub const SEQIO: u16 = 16384;

    /// Creates options from a raw value.
    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Returns the raw option bits.
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Returns `true` if the server should compress (`kXR_compress`).
    #[must_use]
    pub const fn compress(self) -> bool {
        self.0 & Self::COMPRESS != 0
    }

    /// Returns `true` if the server should return stat data (`kXR_retstat`).
    #[must_use]
    pub const fn retstat(self) -> bool {
        self.0 & Self::RETSTAT != 0
    }

    /// Returns a copy with extra bits set.
    #[must_use]
    pub const fn with(self, bits: u16) -> Self {
        Self(self.0 | bits)
    }
}

/// Permission bits of a `kXR_open`, `kXR_mkdir` or `kXR_chmod` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OpenMode(u16);

impl OpenMode {
    pub const UR: u16 = 0x100;
    pub const UW: u16 = 0x080;
    pub const UX: u16 = 0x040;
    pub const GR: u16 = 0x020;
    pub const GW: u16 = 0x010;
    pub const GX: u16 = 0x008;
    pub const OR: u16 = 0x004;
    pub const OW: u16 = 0x002;
    pub const OX: u16 = 0x001;

    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// Owner read/write, group and other read.
    #[must_use]
    pub const fn default_file() -> Self {
        Self(Self::UR | Self::UW | Self::GR | Self::OR)
    }
}

/// Capability and version byte of a `kXR_login` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LoginCapability(u8);

impl LoginCapability {
    pub const NONE: u8 = 0;
    pub const VERSION_MASK: u8 = 63;
    pub const ASYNC: u8 = 128;

    pub const VER000: u8 = 0;
    pub const VER001: u8 = 1;
    pub const VER002: u8 = 2;
    pub const VER003: u8 = 3;

    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Async-capable, version 3: what a current client advertises.
    #[must_use]
    pub const fn current() -> Self {
        Self(Self::ASYNC | Self::VER003)
    }

    #[must_use]
    pub const fn version(self) -> u8 {
        self.0 & Self::VERSION_MASK
    }

    #[must_use]
    pub const fn is_async(self) -> bool {
        self.0 & Self::ASYNC != 0
    }
}

/// Login role byte (`kXR_useruser` / `kXR_useradmin`), sent as an ASCII digit.
pub const ROLE_USER: u8 = b'0';
pub const ROLE_ADMIN: u8 = b'1';

/// Options of a `kXR_stat` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StatOptions(u8);

impl StatOptions {
    pub const VFS: u8 = 1;

    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn vfs(self) -> bool {
        self.0 & Self::VFS != 0
    }
}

/// Options of a `kXR_mkdir` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MkdirOptions(u8);

impl MkdirOptions {
    pub const NONE: u8 = 0;
    pub const MKDIRPATH: u8 = 1;

    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

/// Options of a `kXR_prepare` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PrepareOptions(u8);

impl PrepareOptions {
    pub const CANCEL: u8 = 1;
    pub const NOTIFY: u8 = 2;
    pub const NOERRS: u8 = 4;
    pub const STAGE: u8 = 8;
    pub const WMODE: u8 = 16;
    pub const COLOC: u8 = 32;
    pub const FRESH: u8 = 64;

    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }
}

/// Query type carried in `reqcode` of a `kXR_query` request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QueryType(u16);

impl QueryType {
    pub const STATS: Self = Self(1);
    pub const PREP: Self = Self(2);
    pub const CHECKSUM: Self = Self(3);
    pub const XATTR: Self = Self(4);
    pub const SPACE: Self = Self(5);
    pub const CHECKSUM_CANCEL: Self = Self(6);
    pub const CONFIG: Self = Self(7);
    pub const VISA: Self = Self(8);
    pub const OPAQUE: Self = Self(16);
    pub const OPAQUE_FILE: Self = Self(32);

    #[must_use]
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}
