use crate::models::ChainReference;

/// Chain names accepted by the `CHAIN_NAME` selector, as the frontend names them.
const NAMED_CHAINS: &[(&str, u64)] = &[
    ("hardhat", 31337),
    ("localhost", 31337),
    ("foundry", 31337),
    ("mainnet", 1),
    ("sepolia", 11155111),
    ("holesky", 17000),
    ("base", 8453),
    ("baseSepolia", 84532),
    ("optimism", 10),
    ("optimismSepolia", 11155420),
    ("arbitrum", 42161),
    ("arbitrumSepolia", 421614),
    ("polygon", 137),
    ("polygonAmoy", 80002),
];

impl ChainReference {
    pub fn from_name(name: &str) -> Option<Self> {
        NAMED_CHAINS
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, id)| ChainReference(*id))
    }
}
