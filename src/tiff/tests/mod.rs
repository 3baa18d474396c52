//! Unit tests for the TIFF parsing layer
