//! Static fallback data for universe resolution
//!
//! Versioned constant tables loaded at startup so degraded behavior is
//! reproducible in tests: a default pair list used when the baseline
//! exchange cannot be reached, and a static market-cap ordering used when
//! the ranking source is fully down.

use std::collections::HashMap;

/// Well-known USDT pairs, used when the baseline instruments fetch fails
pub const DEFAULT_PAIRS: [&str; 40] = [
    "BTCUSDT", "ETHUSDT", "BNBUSDT", "XRPUSDT", "ADAUSDT", "SOLUSDT", "DOGEUSDT", "DOTUSDT",
    "MATICUSDT", "LTCUSDT", "TRXUSDT", "AVAXUSDT", "LINKUSDT", "ATOMUSDT", "UNIUSDT", "ETCUSDT",
    "XLMUSDT", "NEARUSDT", "APTUSDT", "FILUSDT", "ALGOUSDT", "VETUSDT", "ICPUSDT", "ARBUSDT",
    "OPUSDT", "INJUSDT", "MKRUSDT", "AAVEUSDT", "GRTUSDT", "SHIBUSDT", "PEPEUSDT", "FLOKIUSDT",
    "LDOUSDT", "RNDRUSDT", "FTMUSDT", "SANDUSDT", "MANAUSDT", "AXSUSDT", "THETAUSDT", "IMXUSDT",
];

/// Asset symbols in approximate market-cap order (rank = index + 1),
/// snapshotted from the ranking source. Refreshed manually on release.
pub const STATIC_RANK_SYMBOLS: [&str; 300] = [
    "BTC", "ETH", "USDT", "XRP", "BNB", "SOL", "USDC", "DOGE", "ADA", "TRX",
    "LINK", "AVAX", "XLM", "SUI", "SHIB", "TON", "HBAR", "DOT", "LTC", "BCH",
    "PEPE", "UNI", "NEAR", "APT", "ICP", "ETC", "POL", "TAO", "AAVE", "RENDER",
    "FIL", "ARB", "ATOM", "OP", "INJ", "VET", "FTM", "ALGO", "KAS", "SEI",
    "IMX", "GRT", "RUNE", "THETA", "MKR", "FLOW", "JUP", "LDO", "TIA", "QNT",
    "STX", "EOS", "FLR", "XTZ", "BONK", "WIF", "PYTH", "FLOKI", "GALA", "SAND",
    "BEAM", "NEO", "IOTA", "EGLD", "AXS", "XEC", "WLD", "ORDI", "MANA", "MINA",
    "KAVA", "APE", "CFX", "ROSE", "AR", "ENS", "DYDX", "CHZ", "SNX", "ETHFI",
    "PENDLE", "ZK", "RON", "AKT", "CAKE", "GNO", "STRK", "COMP", "1INCH", "CKB",
    "CELO", "NOT", "ASTR", "TWT", "KSM", "JASMY", "GMT", "ZIL", "ENJ", "BAT",
    "LPT", "DASH", "NEXO", "HOT", "RVN", "QTUM", "ANKR", "MASK", "SSV", "FET",
    "OSMO", "TRB", "BLUR", "ONE", "JTO", "XDC", "GLM", "ZRX", "ARKM", "SFP",
    "BAND", "ONT", "WOO", "ICX", "IOTX", "SKL", "DGB", "C98", "YFI", "OM",
    "LUNC", "WAVES", "BICO", "CVC", "STORJ", "LRC", "SUSHI", "UMA", "KNC", "CTSI",
    "COTI", "BAL", "PEOPLE", "OGN", "POWR", "SXP", "REQ", "ARPA", "NKN", "DENT",
    "SC", "STMX", "VTHO", "ACH", "SLP", "WIN", "CELR", "HIVE", "SPELL", "AUDIO",
    "DODO", "ALICE", "TLM", "PHA", "MTL", "OXT", "BNT", "SYS", "MBOX", "REN",
    "FLM", "PERP", "BADGER", "FIS", "POND", "TKO", "ATA", "RAY", "PUNDIX", "DUSK",
    "FORTH", "RLC", "FIDA", "AVA", "FRONT", "LINA", "AERGO", "DATA", "AST", "MDT",
    "KEY", "STPT", "DOCK", "RIF", "AGLD", "RARE", "ILV", "YGG", "GHST", "ALPHA",
    "API3", "AUCTION", "BAKE", "BEL", "BLZ", "CHESS", "CHR", "COMBO", "COS", "CREAM",
    "CRV", "CVX", "DAR", "DF", "DIA", "EDU", "EPX", "ERN", "FARM", "FLUX",
    "FXS", "GAL", "GAS", "GFT", "GLMR", "HARD", "HFT", "HIGH", "HOOK", "ID",
    "IDEX", "IQ", "JOE", "KDA", "KLAY", "KMD", "LEVER", "LIT", "LOKA", "LOOM",
    "LQTY", "LSK", "MAGIC", "MANTA", "MAV", "MBL", "MC", "MDX", "METIS", "MLN",
    "MOVR", "NFP", "NMR", "OAX", "OCEAN", "OG", "OOKI", "ORN", "PAXG", "PHB",
    "PIVX", "PLA", "POLYX", "PORTAL", "PROM", "PROS", "PSG", "QI", "QUICK", "RAD",
    "RDNT", "REEF", "REI", "RNDR", "ROOK", "RPL", "RSR", "SANTOS", "SCRT", "SNT",
    "SOLO", "SPARTA", "STEEM", "STG", "STRAX", "SUN", "SUPER", "SWEAT", "SYN", "TFUEL",
    "TOMO", "TRU", "TVK", "UNFI", "UTK", "VGX", "VIB", "VITE", "VOXEL", "WAN",
];

/// Static rank table keyed by canonical pair symbol
pub fn static_rank_table() -> HashMap<String, u32> {
    STATIC_RANK_SYMBOLS
        .iter()
        .enumerate()
        .map(|(i, sym)| (format!("{}USDT", sym), i as u32 + 1))
        .collect()
}
