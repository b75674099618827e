use std::io::Write;

use blockstore::{
    BlockStore, Error,
    block::{Allocator, BLOCK_SIZE, Block, BlockId},
};

fn usage() -> ! {
    eprintln!("usage: bstool <command> <image> [args]");
    eprintln!();
    eprintln!("commands:");
    eprintln!("  create <image>               write an empty store");
    eprintln!("  info <image>                 print block counts");
    eprintln!("  alloc <image>                allocate the lowest free block");
    eprintln!("  request <image> <id>         allocate a specific block");
    eprintln!("  release <image> <id>         free a block");
    eprintln!("  read <image> <id>            write a block's contents to stdout");
    eprintln!("  write <image> <id> <file>    overwrite a block with a file's contents");
    std::process::exit(1);
}

fn fail(message: &str, err: Error) -> ! {
    eprintln!(
        "bstool: {}: {}",
        message,
        std::io::Error::from_raw_os_error(err.into())
    );
    std::process::exit(1);
}

fn load(image: &str) -> BlockStore {
    match BlockStore::deserialize(image) {
        Ok(store) => store,
        Err(e) => fail(&format!("failed to load image {}", image), e),
    }
}

fn save(store: &BlockStore, image: &str) {
    if let Err(e) = store.serialize(image) {
        fail(&format!("failed to save image {}", image), e);
    }
}

fn parse_id(arg: Option<&String>) -> BlockId {
    let Some(arg) = arg else {
        eprintln!("bstool: no block id specified");
        usage();
    };
    match arg.parse() {
        Ok(id) => id,
        Err(_) => {
            eprintln!("bstool: invalid block id {}", arg);
            std::process::exit(1);
        }
    }
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (command, image, rest) = match args.as_slice() {
        [command, image, rest @ ..] => (command.as_str(), image.as_str(), rest),
        [_] => {
            eprintln!("bstool: no image specified");
            usage();
        }
        [] => usage(),
    };

    let expected_args = match command {
        "create" | "info" | "alloc" => 0,
        "request" | "release" | "read" => 1,
        "write" => 2,
        _ => {
            eprintln!("bstool: unknown command {}", command);
            usage();
        }
    };
    if rest.len() > expected_args {
        eprintln!("bstool: too many arguments");
        usage();
    }

    match command {
        "create" => {
            save(&BlockStore::new(), image);
            eprintln!(
                "bstool: created store on {} with {} blocks",
                image,
                BlockStore::total_blocks()
            );
        }
        "info" => {
            let store = load(image);
            println!("total: {}", BlockStore::total_blocks());
            println!("used: {}", store.used_blocks());
            println!("free: {}", store.free_blocks());
        }
        "alloc" => {
            let mut store = load(image);
            let id = match store.allocate() {
                Ok(id) => id,
                Err(e) => fail("failed to allocate block", e.into()),
            };
            save(&store, image);
            println!("{}", id);
        }
        "request" => {
            let id = parse_id(rest.first());
            let mut store = load(image);
            if let Err(e) = store.request(id) {
                fail(&format!("failed to allocate block {}", id), e.into());
            }
            save(&store, image);
        }
        "release" => {
            let id = parse_id(rest.first());
            let mut store = load(image);
            if let Err(e) = store.release(id) {
                fail(&format!("failed to release block {}", id), e.into());
            }
            save(&store, image);
        }
        "read" => {
            let id = parse_id(rest.first());
            let store = load(image);
            let mut buf = [0u8; BLOCK_SIZE];
            if let Err(e) = store.read(id, &mut buf) {
                fail(&format!("failed to read block {}", id), e);
            }
            if let Err(e) = std::io::stdout().write_all(&buf) {
                fail("failed to write to stdout", e.into());
            }
        }
        "write" => {
            let id = parse_id(rest.first());
            let Some(source) = rest.get(1) else {
                eprintln!("bstool: no source file specified");
                usage();
            };
            let data = match std::fs::read(source) {
                Ok(data) => data,
                Err(e) => fail(&format!("failed to read {}", source), e.into()),
            };
            if data.len() > BLOCK_SIZE {
                eprintln!(
                    "bstool: {} is {} bytes, larger than a block ({} bytes)",
                    source,
                    data.len(),
                    BLOCK_SIZE
                );
                std::process::exit(1);
            }
            let mut store = load(image);
            let block = Block::new(&data);
            if let Err(e) = store.write(id, &block.data) {
                fail(&format!("failed to write block {}", id), e);
            }
            save(&store, image);
        }
        _ => unreachable!(),
    }
}
