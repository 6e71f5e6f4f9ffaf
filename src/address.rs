use crate::error::{Error, Result};
use crate::params::{
    SPX_ADDR_BYTES, SPX_OFFSET_CHAIN_ADDR, SPX_OFFSET_HASH_ADDR, SPX_OFFSET_KP_ADDR1,
    SPX_OFFSET_KP_ADDR2, SPX_OFFSET_LAYER, SPX_OFFSET_TREE, SPX_OFFSET_TREE_HGT,
    SPX_OFFSET_TREE_INDEX, SPX_OFFSET_TYPE, SPX_SHA256_ADDR_BYTES, SPX_TREE_HEIGHT,
};
use crate::utils::{get_u32_at, get_u64_at, set_byte_at, set_u32_at, set_u64_at};

/// The 5 types of ADRS used by the hypertree, WOTS+ and FORS.
/// The 1-byte corresponding value is set as the `type` in an ADRS.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum AdrsType {
    /// SPX_ADDR_TYPE_WOTS: 0, used for hashing through a chain and deriving chain starts.
    WotsHash = 0,
    /// SPX_ADDR_TYPE_WOTSPK: 1, used for compression of the WOTS+ public key.
    WotsPk = 1,
    /// SPX_ADDR_TYPE_HASHTREE: 2, used for the inner nodes of the hypertree subtrees.
    HashTree = 2,
    /// SPX_ADDR_TYPE_FORSTREE: 3, used for FORS leaves and inner nodes.
    ForsTree = 3,
    /// SPX_ADDR_TYPE_FORSPK: 4, used for compression of the FORS roots.
    ForsPk = 4,
}

impl AdrsType {
    /// Decodes the type byte of an address. Unknown values yield `None`.
    pub fn from_byte(value: u8) -> Option<Self> {
        match value {
            0 => Some(AdrsType::WotsHash),
            1 => Some(AdrsType::WotsPk),
            2 => Some(AdrsType::HashTree),
            3 => Some(AdrsType::ForsTree),
            4 => Some(AdrsType::ForsPk),
            _ => None,
        }
    }

    fn has_keypair(self) -> bool {
        !matches!(self, AdrsType::HashTree)
    }

    fn has_chain(self) -> bool {
        matches!(self, AdrsType::WotsHash)
    }

    fn has_tree_node(self) -> bool {
        matches!(self, AdrsType::HashTree | AdrsType::ForsTree)
    }
}

/// The address `Address` is a 32-byte value (eight 32-bit words in hashing
/// order) that domain-separates every hash invocation.
///
/// The fields occupy fixed byte offsets, shared by all types:
/// * `layer address`: a single byte, the hypertree layer.
/// * `tree address`: an 8-byte big-endian value, the subtree within the layer.
/// * `type`: a single byte set by [`AdrsType`].
/// * `key pair address`: one byte (two when the subtree height exceeds 8).
/// * `chain address` / `hash address`: one byte each, WOTS+ hash-chain types only.
/// * `tree height` / `tree index`: one byte and a 4-byte big-endian value, tree types only.
///
/// Chain address and tree height share byte 17; which one is meaningful
/// depends on the type. Only the first [`SPX_SHA256_ADDR_BYTES`] bytes are
/// hashed (see [`Address::compressed`]).
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, Hash)]
pub struct Address([u8; SPX_ADDR_BYTES]);

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<AdrsType> for Address {
    /// Returns an all-zero address with only the type set.
    fn from(adrs_type: AdrsType) -> Self {
        let mut adrs = Self::default();
        adrs.set_type(adrs_type);
        adrs
    }
}

impl From<[u8; SPX_ADDR_BYTES]> for Address {
    fn from(bytes: [u8; SPX_ADDR_BYTES]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Address {
    type Error = Error;

    /// Reads an address back from its 32-byte image.
    fn try_from(bytes: &[u8]) -> Result<Self> {
        Ok(Self(bytes.try_into()?))
    }
}

impl Address {
    /// The part of the address that is mixed into SHA-256 based hashes.
    pub fn compressed(&self) -> &[u8] {
        &self.0[..SPX_SHA256_ADDR_BYTES]
    }

    pub fn to_bytes(&self) -> [u8; SPX_ADDR_BYTES] {
        self.0
    }

    /// The eight 32-bit words as they sit in memory, i.e. each word is the
    /// native-endian reading of four address bytes.
    pub fn words(&self) -> [u32; 8] {
        let mut words = [0_u32; 8];
        for (word, chunk) in words.iter_mut().zip(self.0.chunks_exact(4)) {
            *word = u32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        words
    }

    /// Specify which level of Merkle tree (the "layer") we're working on.
    pub fn set_layer_addr(&mut self, layer: u32) {
        set_byte_at(self.0.as_mut(), layer as u8, SPX_OFFSET_LAYER);
    }

    pub fn layer_addr(&self) -> u32 {
        u32::from(self.0[SPX_OFFSET_LAYER])
    }

    /// Specify which Merkle tree within the level (the "tree address") we're working on.
    pub fn set_tree_addr(&mut self, tree: u64) {
        set_u64_at(self.0.as_mut(), tree, SPX_OFFSET_TREE);
    }

    pub fn tree_addr(&self) -> u64 {
        get_u64_at(&self.0, SPX_OFFSET_TREE)
    }

    /// Specify the reason we'll use this address structure for, that is, what
    /// hash will we compute with it. This is used so that unrelated types of
    /// hashes don't accidentally get the same address structure.
    pub fn set_type(&mut self, adrs_type: AdrsType) {
        set_byte_at(self.0.as_mut(), adrs_type as u8, SPX_OFFSET_TYPE);
    }

    /// The type tag, or `None` if the type byte holds no known type.
    pub fn addr_type(&self) -> Option<AdrsType> {
        AdrsType::from_byte(self.0[SPX_OFFSET_TYPE])
    }

    /// Copy the layer and tree fields of the address structure. This is used
    /// when we're doing multiple types of hashes within the same Merkle tree.
    pub fn copy_subtree_addr(&mut self, src: &Address) {
        self.0[..SPX_OFFSET_TREE + 8].copy_from_slice(&src.0[..SPX_OFFSET_TREE + 8]);
    }

    /// Specify which Merkle leaf we're working on; that is, which OTS keypair
    /// we're talking about.
    pub fn set_keypair_addr(&mut self, keypair: u32) {
        self.debug_assert_field(AdrsType::has_keypair, "keypair");
        if SPX_TREE_HEIGHT > 8 {
            set_byte_at(self.0.as_mut(), (keypair >> 8) as u8, SPX_OFFSET_KP_ADDR2);
        }
        set_byte_at(self.0.as_mut(), keypair as u8, SPX_OFFSET_KP_ADDR1);
    }

    pub fn keypair_addr(&self) -> u32 {
        let low = u32::from(self.0[SPX_OFFSET_KP_ADDR1]);
        if SPX_TREE_HEIGHT > 8 {
            (u32::from(self.0[SPX_OFFSET_KP_ADDR2]) << 8) | low
        } else {
            low
        }
    }

    /// Copy the layer, tree and keypair fields of the address structure. This is
    /// used when we're doing multiple things within the same OTS keypair.
    pub fn copy_keypair_addr(&mut self, src: &Address) {
        self.copy_subtree_addr(src);
        if SPX_TREE_HEIGHT > 8 {
            self.0[SPX_OFFSET_KP_ADDR2] = src.0[SPX_OFFSET_KP_ADDR2];
        }
        self.0[SPX_OFFSET_KP_ADDR1] = src.0[SPX_OFFSET_KP_ADDR1];
    }

    /// Specify which Merkle chain within the OTS we're working with
    /// (the chain address).
    pub fn set_chain_addr(&mut self, chain: u32) {
        self.debug_assert_field(AdrsType::has_chain, "chain");
        set_byte_at(self.0.as_mut(), chain as u8, SPX_OFFSET_CHAIN_ADDR);
    }

    pub fn chain_addr(&self) -> u32 {
        u32::from(self.0[SPX_OFFSET_CHAIN_ADDR])
    }

    /// Specify where in the Merkle chain we are
    /// (the hash address).
    pub fn set_hash_addr(&mut self, hash: u32) {
        self.debug_assert_field(AdrsType::has_chain, "hash");
        set_byte_at(self.0.as_mut(), hash as u8, SPX_OFFSET_HASH_ADDR);
    }

    pub fn hash_addr(&self) -> u32 {
        u32::from(self.0[SPX_OFFSET_HASH_ADDR])
    }

    /// Specify the height of the node in the Merkle/FORS tree we are in
    /// (the tree height).
    pub fn set_tree_height(&mut self, tree_height: u32) {
        self.debug_assert_field(AdrsType::has_tree_node, "tree height");
        set_byte_at(self.0.as_mut(), tree_height as u8, SPX_OFFSET_TREE_HGT);
    }

    pub fn tree_height(&self) -> u32 {
        u32::from(self.0[SPX_OFFSET_TREE_HGT])
    }

    /// Specify the distance from the left edge of the node in the Merkle/FORS tree
    /// (the tree index).
    pub fn set_tree_index(&mut self, tree_index: u32) {
        self.debug_assert_field(AdrsType::has_tree_node, "tree index");
        set_u32_at(self.0.as_mut(), tree_index, SPX_OFFSET_TREE_INDEX);
    }

    pub fn tree_index(&self) -> u32 {
        get_u32_at(&self.0, SPX_OFFSET_TREE_INDEX)
    }

    fn debug_assert_field(&self, allowed: fn(AdrsType) -> bool, field: &str) {
        debug_assert!(
            self.addr_type().map_or(false, allowed),
            "{} field written on an address of type {:?}",
            field,
            self.addr_type()
        );
    }
}
