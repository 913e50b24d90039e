pub mod perfume_bot;
