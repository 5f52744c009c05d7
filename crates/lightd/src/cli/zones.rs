//! `zones` subcommand: list zones that have a handler.

use super::{Result, SUPPORTED_ZONES, ZoneJson, ZonesOutput, print_json_pretty};

pub(super) fn cmd_zones(json: bool) -> Result<()> {
    if json {
        let output = ZonesOutput {
            count: SUPPORTED_ZONES.len(),
            zones: SUPPORTED_ZONES
                .iter()
                .map(|z| ZoneJson {
                    name: z.name().to_string(),
                    id: z.id(),
                })
                .collect(),
        };
        return print_json_pretty(&output);
    }

    for zone in SUPPORTED_ZONES {
        println!("{:>2}  {zone}", zone.id());
    }
    Ok(())
}
