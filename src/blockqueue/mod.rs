//! Provides a queue of image tiles for the worker threads casting
//! rays. The queue itself is not changed after creation, we simply
//! work through it with an atomic counter to track the index of the
//! next tile to work on. Tiles are handed out in 2D Morton order, so
//! consecutive tiles cover nearby parts of the scene.

// std
use std::sync::atomic::{AtomicUsize, Ordering};
// others
use log::warn;

// see github/tray_rust/src/sampler/block_queue.rs

/// The queue of tiles to be worked on, shared immutably between worker
/// threads.
pub struct BlockQueue {
    /// tile coordinates (in tiles, not pixels)
    blocks: Vec<(u32, u32)>,
    /// image resolution in pixels
    image: (u32, u32),
    /// size of a full tile in pixels
    dimensions: (u32, u32),
    /// index of the next tile to be worked on
    next: AtomicUsize,
}

/// Pixel range `[x0, x1) x [y0, y1)` of one tile, clipped to the image.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Tile {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl Tile {
    pub fn pixels(&self) -> impl Iterator<Item = (u32, u32)> {
        let (x0, x1) = (self.x0, self.x1);
        (self.y0..self.y1).flat_map(move |y| (x0..x1).map(move |x| (x, y)))
    }
    pub fn area(&self) -> usize {
        ((self.x1 - self.x0) * (self.y1 - self.y0)) as usize
    }
}

impl BlockQueue {
    /// Cover an image of resolution `img` with tiles of size `dim`.
    /// Tiles along the right and bottom edges may be smaller.
    pub fn new(img: (u32, u32), dim: (u32, u32)) -> BlockQueue {
        let dim = (dim.0.max(1), dim.1.max(1));
        let num_blocks = (
            (img.0 + dim.0 - 1) / dim.0,
            (img.1 + dim.1 - 1) / dim.1,
        );
        let mut blocks: Vec<(u32, u32)> = (0..num_blocks.0 * num_blocks.1)
            .map(|i| (i % num_blocks.0, i / num_blocks.0))
            .collect();
        blocks.sort_by_key(|b| morton2(*b));
        if blocks.is_empty() {
            warn!("Block queue for a {:?} image is empty", img);
        }
        BlockQueue {
            blocks,
            image: img,
            dimensions: dim,
            next: AtomicUsize::new(0),
        }
    }
    /// Get the dimensions of a full tile in the queue
    pub fn block_dim(&self) -> (u32, u32) {
        self.dimensions
    }
    /// Pixel range of the tile at tile coordinates *block*.
    pub fn tile(&self, block: (u32, u32)) -> Tile {
        let x0: u32 = block.0 * self.dimensions.0;
        let y0: u32 = block.1 * self.dimensions.1;
        Tile {
            x0,
            y0,
            x1: (x0 + self.dimensions.0).min(self.image.0),
            y1: (y0 + self.dimensions.1).min(self.image.1),
        }
    }
    /// Get an iterator to work through the queue
    pub fn iter(&self) -> BlockQueueIterator {
        BlockQueueIterator { queue: self }
    }
    /// Get the next tile in the queue or None if the queue is finished
    pub fn next(&self) -> Option<Tile> {
        let i = self.next.fetch_add(1, Ordering::AcqRel);
        if i >= self.blocks.len() {
            None
        } else {
            Some(self.tile(self.blocks[i]))
        }
    }
    /// Get the length of the queue
    pub fn len(&self) -> usize {
        self.blocks.len()
    }
    /// Check if the queue is worked off
    pub fn is_empty(&self) -> bool {
        self.next.load(Ordering::Acquire) >= self.blocks.len()
    }
}

/// Iterator to work through the queue safely
pub struct BlockQueueIterator<'a> {
    queue: &'a BlockQueue,
}

impl<'a> Iterator for BlockQueueIterator<'a> {
    type Item = Tile;
    fn next(&mut self) -> Option<Tile> {
        self.queue.next()
    }
}

// see github/tray_rust/src/sampler/morton.rs

/// Insert a 0 bit between each of the low 16 bits of x
fn part1_by1(mut x: u32) -> u32 {
    // x = ---- ---- ---- ---- fedc ba98 7654 3210
    x &= 0x0000_ffff;
    // x = ---- ---- fedc ba98 ---- ---- 7654 3210
    x = (x ^ (x << 8)) & 0x00ff_00ff;
    // x = ---- fedc ---- ba98 ---- 7654 ---- 3210
    x = (x ^ (x << 4)) & 0x0f0f_0f0f;
    // x = --fe --dc --ba --98 --76 --54 --32 --10
    x = (x ^ (x << 2)) & 0x3333_3333;
    // x = -f-e -d-c -b-a -9-8 -7-6 -5-4 -3-2 -1-0
    (x ^ (x << 1)) & 0x5555_5555
}

/// Compute the Morton code for the `(x, y)` position.
fn morton2(p: (u32, u32)) -> u32 {
    (part1_by1(p.1) << 1) + part1_by1(p.0)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn tiles_cover_every_pixel_once() {
        let queue = BlockQueue::new((37, 20), (16, 16));
        assert_eq!(queue.len(), 6);
        let mut covered = vec![0_u8; 37 * 20];
        for tile in queue.iter() {
            for (x, y) in tile.pixels() {
                covered[(y * 37 + x) as usize] += 1;
            }
        }
        assert!(covered.iter().all(|&c| c == 1));
        assert!(queue.is_empty());
        assert!(queue.next().is_none());
    }

    #[test]
    fn tiles_come_in_morton_order() {
        let queue = BlockQueue::new((64, 64), (16, 16));
        let first: Vec<(u32, u32)> = queue.iter().take(4).map(|t| (t.x0, t.y0)).collect();
        assert_eq!(first, vec![(0, 0), (16, 0), (0, 16), (16, 16)]);
    }

    #[test]
    fn edge_tiles_are_clipped() {
        let queue = BlockQueue::new((20, 10), (16, 16));
        assert_eq!(
            queue.tile((1, 0)),
            Tile {
                x0: 16,
                y0: 0,
                x1: 20,
                y1: 10
            }
        );
        assert_eq!(queue.tile((1, 0)).area(), 40);
    }
}
