//! 各合约用到的方法（human-readable ABI），只列出本层会调用的部分

pub const NFT_ABI: &[&str] = &[
    "function setApprovalForAll(address operator, bool approved)",
    "function burn(uint256 tokenId)",
    "function transferFrom(address from, address to, uint256 tokenId)",
    "function createEditionWithNFTs(uint256 editionQuantity, address to, string tokenURI, uint256 royaltyPercentage)",
    "function safeMintToEditionQuantity(address to, string tokenURI, uint256 editionNumber, uint256 quantity)",
    "function createEdition(uint256 editionQuantity, address to, uint256 royaltyPercentage)",
    "function editions(uint256 editionNumber) view returns (uint256 numSold, uint256 quantity, uint256 royaltyPercentage)",
];

pub const MARKETPLACE_ABI: &[&str] = &[
    "function buyItem(address nftAddress, uint256 tokenId, address owner, bool isPaymentToken) payable",
    "function cancelListing(address nftAddress, uint256 tokenId)",
    "function listItem(address nftAddress, uint256 tokenId, uint256 quantity, uint256 pricePerItem, uint256 tokenPricePerItem, bool acceptsNative, bool acceptsToken, uint256 startingTime)",
    "function updateListing(address nftAddress, uint256 tokenId, uint256 newPrice, uint256 newTokenPrice, bool acceptsNative, bool acceptsToken, uint256 startingTime)",
    "function listEdition(address nftAddress, uint256 editionNumber, uint256 pricePerItem, uint256 tokenPricePerItem, bool acceptsNative, bool acceptsToken, uint256 startingTime)",
    "function cancelEditionListing(address nftAddress, uint256 editionNumber)",
    "function listBatch(address nftAddress, uint256[] tokenIds, uint256 pricePerItem, uint256 tokenPricePerItem, bool acceptsNative, bool acceptsToken, uint256 startingTime)",
    "function cancelListingBatch(address nftAddress, uint256[] tokenIds)",
    "function rewardsRate() view returns (uint256)",
];

pub const MARKETPLACE_LEGACY_ABI: &[&str] = &[
    "function buyItem(address nftAddress, uint256 tokenId, address owner) payable",
    "function cancelListing(address nftAddress, uint256 tokenId)",
    "function listItem(address nftAddress, uint256 tokenId, uint256 quantity, uint256 pricePerItem, uint256 startingTime)",
    "function updateListing(address nftAddress, uint256 tokenId, uint256 newPrice, uint256 startingTime)",
];

pub const AUCTION_ABI: &[&str] = &[
    "function placeBid(address nftAddress, uint256 tokenId, bool isPaymentToken, uint256 amount) payable",
    "function createAuction(address nftAddress, uint256 tokenId, uint256 reservePrice, bool isPaymentToken, uint256 startTimestamp, uint256 endTimestamp)",
    "function updateAuction(address nftAddress, uint256 tokenId, uint256 reservePrice, bool isPaymentToken, uint256 startTimestamp, uint256 endTimestamp)",
    "function cancelAuction(address nftAddress, uint256 tokenId)",
    "function resultAuction(address nftAddress, uint256 tokenId)",
];

pub const AUCTION_LEGACY_ABI: &[&str] = &[
    "function placeBid(address nftAddress, uint256 tokenId) payable",
    "function createAuction(address nftAddress, uint256 tokenId, uint256 reservePrice, uint256 startTimestamp, uint256 endTimestamp)",
    "function updateAuction(address nftAddress, uint256 tokenId, uint256 reservePrice, uint256 startTimestamp, uint256 endTimestamp)",
    "function cancelAuction(address nftAddress, uint256 tokenId)",
    "function resultAuction(address nftAddress, uint256 tokenId)",
];

pub const CLAIM_ABI: &[&str] = &[
    "function claim(address to, uint256 amount, bytes32[] proof)",
    "function hasClaimed(address account) view returns (bool)",
];

pub const TOKEN_ABI: &[&str] = &["function transfer(address to, uint256 amount) returns (bool)"];
