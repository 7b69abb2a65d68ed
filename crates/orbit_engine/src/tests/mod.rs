//! Cross-module tests driving whole frames through the engine
