use anyhow::Context;
use clap::{ArgAction, Parser};
use fmp4box::boxes::{is_container_tag, is_full_box_tag};
use fmp4box::{BoxRead, children_of, pretty, stream};
use serde::Serialize;
use std::fs::File;
use std::io::BufReader;

#[derive(Parser, Debug)]
#[command(version, about = "Fragmented MP4 / HDS box tree dumper")]
struct Args {
    /// MP4 / fragment / bootstrap file path
    path: String,

    /// Emit JSON instead of the human-readable tree
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,
}

#[derive(Serialize)]
struct JsonBox {
    typ: String,
    size: u64,
    kind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    uuid: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    flags: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    children: Option<Vec<JsonBox>>,
}

fn build_json(b: &impl BoxRead) -> JsonBox {
    let tag = b.box_type();
    let h = b.header_len();

    let uuid = if &tag.0 == b"uuid" {
        b.get_string(h)
            .ok()
            .filter(|p| p.len() >= 16)
            .map(|p| hex::encode(&p[..16]))
    } else {
        None
    };

    let (version, flags) = if is_full_box_tag(tag) {
        (b.get_u8(h).ok(), b.get_u24(h + 1).ok())
    } else {
        (None, None)
    };

    let (kind, children) = if is_container_tag(tag) {
        let kids = children_of(b).iter().map(|c| build_json(c)).collect();
        ("container".to_string(), Some(kids))
    } else if uuid.is_some() {
        ("uuid".to_string(), None)
    } else if version.is_some() {
        ("full".to_string(), None)
    } else {
        ("leaf".to_string(), None)
    };

    JsonBox {
        typ: tag.to_string(),
        size: b.boxed_size(),
        kind,
        uuid,
        version,
        flags,
        children,
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let f = File::open(&args.path).with_context(|| format!("opening {}", args.path))?;
    let mut r = BufReader::new(f);

    let boxes = stream::read_boxes(&mut r).context("reading boxes")?;

    if args.json {
        let nodes: Vec<JsonBox> = boxes.iter().map(|b| build_json(b)).collect();
        println!("{}", serde_json::to_string_pretty(&nodes)?);
        return Ok(());
    }

    for b in &boxes {
        print!("{}", pretty::box_to_string(b, 0));
    }

    Ok(())
}
